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

//! JSON-RPC request routing.
//!
//! One handler instance serves every transport. Requests produce exactly one
//! response; notifications (no id) produce none.

use crate::mcp::prompts::PromptRegistry;
use crate::mcp::protocol::*;
use crate::mcp::resource;
use crate::mcp::tools::ToolRegistry;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

pub struct McpHandler {
    tools: ToolRegistry,
    prompts: PromptRegistry,
}

impl McpHandler {
    pub fn new(tools: ToolRegistry, prompts: PromptRegistry) -> Self {
        Self { tools, prompts }
    }

    /// Handle one request. Returns `None` for notifications.
    pub async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        info!(method = %request.method, "MCP request received");

        let id = match request.id {
            Some(id) => id,
            None => {
                debug!(method = %request.method, "notification, no response");
                return None;
            }
        };

        let response = match request.method.as_str() {
            "ping" => JsonRpcResponse::success(id, json!({})),
            "initialize" => self.handle_initialize(id, request.params),
            "initialized" => JsonRpcResponse::success(id, json!({})),
            "tools/list" => JsonRpcResponse::success(
                id,
                to_json(&ListToolsResult {
                    tools: self.tools.list(),
                }),
            ),
            "tools/call" => self.handle_tools_call(id, request.params).await,
            "prompts/list" => JsonRpcResponse::success(
                id,
                to_json(&ListPromptsResult {
                    prompts: self.prompts.list(),
                }),
            ),
            "prompts/get" => self.handle_prompts_get(id, request.params),
            "resources/list" => JsonRpcResponse::success(
                id,
                to_json(&ListResourcesResult {
                    resources: resource::list(),
                }),
            ),
            "resources/read" => self.handle_resources_read(id, request.params),
            method => {
                warn!(%method, "unknown MCP method");
                JsonRpcResponse::error(id, JsonRpcError::method_not_found(method))
            }
        };

        Some(response)
    }

    fn handle_initialize(&self, id: JsonRpcId, params: Option<Value>) -> JsonRpcResponse {
        let _params: InitializeParams = match params {
            Some(p) => match serde_json::from_value(p) {
                Ok(params) => params,
                Err(e) => {
                    return JsonRpcResponse::error(
                        id,
                        JsonRpcError::invalid_params(format!("Invalid initialize params: {e}")),
                    )
                }
            },
            None => {
                return JsonRpcResponse::error(
                    id,
                    JsonRpcError::invalid_params("Missing initialize params"),
                )
            }
        };

        let result = InitializeResult {
            protocol_version: MCP_PROTOCOL_VERSION.to_string(),
            capabilities: ServerCapabilities {
                prompts: Some(PromptsCapability {
                    list_changed: false,
                }),
                resources: Some(ResourcesCapability {
                    subscribe: false,
                    list_changed: false,
                }),
                tools: Some(ToolsCapability {
                    list_changed: false,
                }),
            },
            server_info: ServerInfo {
                name: "huddle-mcp".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        };

        JsonRpcResponse::success(id, to_json(&result))
    }

    async fn handle_tools_call(&self, id: JsonRpcId, params: Option<Value>) -> JsonRpcResponse {
        let call_params: CallToolParams = match params {
            Some(p) => match serde_json::from_value(p) {
                Ok(params) => params,
                Err(e) => {
                    return JsonRpcResponse::error(
                        id,
                        JsonRpcError::invalid_params(format!("Invalid tool call params: {e}")),
                    )
                }
            },
            None => {
                return JsonRpcResponse::error(
                    id,
                    JsonRpcError::invalid_params("Missing tool call params"),
                )
            }
        };

        info!(tool = %call_params.name, "executing tool");

        match self.tools.call(&call_params.name, call_params.arguments).await {
            Ok(result) => JsonRpcResponse::success(id, to_json(&result)),
            Err(e) => JsonRpcResponse::error(id, e.into()),
        }
    }

    fn handle_prompts_get(&self, id: JsonRpcId, params: Option<Value>) -> JsonRpcResponse {
        let get_params: GetPromptParams = match params {
            Some(p) => match serde_json::from_value(p) {
                Ok(params) => params,
                Err(e) => {
                    return JsonRpcResponse::error(
                        id,
                        JsonRpcError::invalid_params(format!("Invalid prompt params: {e}")),
                    )
                }
            },
            None => {
                return JsonRpcResponse::error(
                    id,
                    JsonRpcError::invalid_params("Missing prompt params"),
                )
            }
        };

        match self.prompts.generate(&get_params.name, &get_params.arguments) {
            Ok(result) => JsonRpcResponse::success(id, to_json(&result)),
            Err(e) => JsonRpcResponse::error(id, e.into()),
        }
    }

    fn handle_resources_read(&self, id: JsonRpcId, params: Option<Value>) -> JsonRpcResponse {
        let read_params: ReadResourceParams = match params {
            Some(p) => match serde_json::from_value(p) {
                Ok(params) => params,
                Err(e) => {
                    return JsonRpcResponse::error(
                        id,
                        JsonRpcError::invalid_params(format!("Invalid read params: {e}")),
                    )
                }
            },
            None => {
                return JsonRpcResponse::error(
                    id,
                    JsonRpcError::invalid_params("Missing read params"),
                )
            }
        };

        match resource::read(&read_params.uri) {
            Ok(result) => JsonRpcResponse::success(id, to_json(&result)),
            Err(e) => JsonRpcResponse::error(id, e.into()),
        }
    }
}

fn to_json<T: Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}
