// Copyright 2025 Huddle (https://github.com/huddle-sports/huddle)
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Tool registry with JSON Schema validation.
//!
//! Each tool registers a name, a description, and an input schema; the
//! schema is compiled once at registration. Dispatch is a single
//! lookup -> validate -> execute path: an unknown name is `MethodNotFound`,
//! a schema violation is `InvalidParams` listing every offending field, and
//! only a fully validated argument object reaches `execute`.

use crate::mcp::error::McpError;
use crate::mcp::protocol::{CallToolResult, Tool};
use async_trait::async_trait;
use jsonschema::JSONSchema;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// A named, schema-validated operation.
#[async_trait]
pub trait McpTool: Send + Sync {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    fn input_schema(&self) -> &Value;

    async fn execute(&self, arguments: Map<String, Value>) -> Result<CallToolResult, McpError>;
}

struct ToolEntry {
    tool: Arc<dyn McpTool>,
    validator: JSONSchema,
}

/// The tool catalog. Built once at startup, read-only afterwards.
#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, ToolEntry>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, tool: Arc<dyn McpTool>) -> Result<(), RegistrationError> {
        let name = tool.name().to_string();
        if self.tools.contains_key(&name) {
            return Err(RegistrationError::DuplicateName(name));
        }

        let validator = JSONSchema::options()
            .compile(tool.input_schema())
            .map_err(|e| RegistrationError::Schema(e.to_string()))?;
        self.tools.insert(name, ToolEntry { tool, validator });
        Ok(())
    }

    pub fn list(&self) -> Vec<Tool> {
        let mut tools: Vec<Tool> = self
            .tools
            .values()
            .map(|entry| Tool {
                name: entry.tool.name().to_string(),
                description: Some(entry.tool.description().to_string()),
                input_schema: entry.tool.input_schema().clone(),
            })
            .collect();
        tools.sort_by(|a, b| a.name.cmp(&b.name));
        tools
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    pub async fn call(
        &self,
        name: &str,
        arguments: Map<String, Value>,
    ) -> Result<CallToolResult, McpError> {
        let entry = self
            .tools
            .get(name)
            .ok_or_else(|| McpError::MethodNotFound(name.to_string()))?;

        let instance = Value::Object(arguments.clone());
        if let Err(errors) = entry.validator.validate(&instance) {
            let message = errors
                .map(|e| {
                    let path = dotted_path(&e.instance_path.to_string());
                    if path.is_empty() {
                        e.to_string()
                    } else {
                        format!("{}: {}", path, e)
                    }
                })
                .collect::<Vec<_>>()
                .join("; ");
            return Err(McpError::InvalidParams(message));
        }

        entry.tool.execute(arguments).await
    }
}

fn dotted_path(pointer: &str) -> String {
    pointer.trim_start_matches('/').replace('/', ".")
}

#[derive(Debug, Error)]
pub enum RegistrationError {
    #[error("Duplicate tool name: {0}")]
    DuplicateName(String),
    #[error("Invalid schema: {0}")]
    Schema(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct EchoTool {
        schema: Value,
    }

    impl EchoTool {
        fn new() -> Self {
            Self {
                schema: json!({
                    "type": "object",
                    "properties": {
                        "message": {"type": "string"},
                        "week": {"type": "integer", "minimum": 1, "maximum": 18},
                    },
                    "required": ["message"],
                }),
            }
        }
    }

    #[async_trait]
    impl McpTool for EchoTool {
        fn name(&self) -> &str {
            "echo"
        }

        fn description(&self) -> &str {
            "Echoes its message argument"
        }

        fn input_schema(&self) -> &Value {
            &self.schema
        }

        async fn execute(&self, arguments: Map<String, Value>) -> Result<CallToolResult, McpError> {
            Ok(CallToolResult::json(&Value::Object(arguments)))
        }
    }

    fn registry() -> ToolRegistry {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(EchoTool::new())).unwrap();
        registry
    }

    fn args(value: Value) -> Map<String, Value> {
        value.as_object().unwrap().clone()
    }

    #[tokio::test]
    async fn unknown_tool_is_method_not_found() {
        let err = registry()
            .call("nonexistent_tool", Map::new())
            .await
            .unwrap_err();
        assert!(matches!(err, McpError::MethodNotFound(_)));
    }

    #[tokio::test]
    async fn missing_required_field_names_the_field() {
        let err = registry().call("echo", Map::new()).await.unwrap_err();
        match err {
            McpError::InvalidParams(msg) => assert!(msg.contains("message"), "got: {msg}"),
            other => panic!("expected InvalidParams, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn all_violations_are_collected() {
        let err = registry()
            .call("echo", args(json!({"week": 0})))
            .await
            .unwrap_err();
        match err {
            McpError::InvalidParams(msg) => {
                assert!(msg.contains("message"), "got: {msg}");
                assert!(msg.contains("week"), "got: {msg}");
            }
            other => panic!("expected InvalidParams, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn boundary_values_pass() {
        for week in [1, 18] {
            registry()
                .call("echo", args(json!({"message": "hi", "week": week})))
                .await
                .unwrap();
        }
        for week in [0, 19] {
            let err = registry()
                .call("echo", args(json!({"message": "hi", "week": week})))
                .await
                .unwrap_err();
            assert!(matches!(err, McpError::InvalidParams(_)));
        }
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let mut registry = registry();
        let err = registry.register(Arc::new(EchoTool::new())).unwrap_err();
        assert!(matches!(err, RegistrationError::DuplicateName(_)));
    }
}
