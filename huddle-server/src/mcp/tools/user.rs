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

//! User lookup tools. Sleeper serves ids and usernames from the same
//! route; the two tools exist so callers get a precise schema for each.

use super::registry::McpTool;
use super::require_str;
use crate::mcp::error::McpError;
use crate::mcp::protocol::CallToolResult;
use crate::sleeper::SleeperClient;
use async_trait::async_trait;
use serde_json::{json, Map, Value};
use std::sync::Arc;

pub struct GetUserByIdTool {
    client: Arc<SleeperClient>,
    schema: Value,
}

impl GetUserByIdTool {
    pub fn new(client: Arc<SleeperClient>) -> Self {
        Self {
            client,
            schema: json!({
                "type": "object",
                "properties": {
                    "user_id": {
                        "type": "string",
                        "description": "Sleeper numeric user id",
                    },
                },
                "required": ["user_id"],
            }),
        }
    }
}

#[async_trait]
impl McpTool for GetUserByIdTool {
    fn name(&self) -> &str {
        "get_user_by_id"
    }

    fn description(&self) -> &str {
        "Get a Sleeper user by their user id"
    }

    fn input_schema(&self) -> &Value {
        &self.schema
    }

    async fn execute(&self, arguments: Map<String, Value>) -> Result<CallToolResult, McpError> {
        let user_id = require_str(&arguments, "user_id")?;
        let user = self.client.user(&user_id).await?;
        Ok(CallToolResult::json(&user))
    }
}

pub struct GetUserByUsernameTool {
    client: Arc<SleeperClient>,
    schema: Value,
}

impl GetUserByUsernameTool {
    pub fn new(client: Arc<SleeperClient>) -> Self {
        Self {
            client,
            schema: json!({
                "type": "object",
                "properties": {
                    "username": {
                        "type": "string",
                        "description": "Sleeper display username",
                    },
                },
                "required": ["username"],
            }),
        }
    }
}

#[async_trait]
impl McpTool for GetUserByUsernameTool {
    fn name(&self) -> &str {
        "get_user_by_username"
    }

    fn description(&self) -> &str {
        "Get a Sleeper user by their username"
    }

    fn input_schema(&self) -> &Value {
        &self.schema
    }

    async fn execute(&self, arguments: Map<String, Value>) -> Result<CallToolResult, McpError> {
        let username = require_str(&arguments, "username")?;
        let user = self.client.user(&username).await?;
        Ok(CallToolResult::json(&user))
    }
}
