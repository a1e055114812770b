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

//! Player and avatar tools. `get_player` answers from the bundled
//! directory and `get_avatar` builds a CDN URL; neither touches the
//! upstream API. `get_trending_players` is the one upstream call here.

use super::registry::McpTool;
use super::{optional_str, optional_u32, require_str};
use crate::mcp::error::McpError;
use crate::mcp::protocol::CallToolResult;
use crate::sleeper::SleeperClient;
use async_trait::async_trait;
use huddle_core::PlayerDirectory;
use serde_json::{json, Map, Value};
use std::sync::Arc;

/// Look a player up in the bundled directory. Unknown ids answer with JSON
/// `null`, the same shape the upstream API uses for unknown entities.
pub struct GetPlayerTool {
    directory: Arc<PlayerDirectory>,
    schema: Value,
}

impl GetPlayerTool {
    pub fn new(directory: Arc<PlayerDirectory>) -> Self {
        Self {
            directory,
            schema: json!({
                "type": "object",
                "properties": {
                    "player_id": {
                        "type": "string",
                        "description": "Sleeper player id",
                    },
                },
                "required": ["player_id"],
            }),
        }
    }
}

#[async_trait]
impl McpTool for GetPlayerTool {
    fn name(&self) -> &str {
        "get_player"
    }

    fn description(&self) -> &str {
        "Get a player's name, number, measurements, and positions by id"
    }

    fn input_schema(&self) -> &Value {
        &self.schema
    }

    async fn execute(&self, arguments: Map<String, Value>) -> Result<CallToolResult, McpError> {
        let player_id = require_str(&arguments, "player_id")?;
        let player = match self.directory.get(&player_id) {
            Some(record) => serde_json::to_value(record)
                .map_err(|e| McpError::Internal(e.to_string()))?,
            None => Value::Null,
        };
        Ok(CallToolResult::json(&player))
    }
}

pub struct GetTrendingPlayersTool {
    client: Arc<SleeperClient>,
    schema: Value,
}

impl GetTrendingPlayersTool {
    pub fn new(client: Arc<SleeperClient>) -> Self {
        Self {
            client,
            schema: json!({
                "type": "object",
                "properties": {
                    "trend_type": {
                        "type": "string",
                        "description": "Whether to list most-added or most-dropped players",
                        "enum": ["add", "drop"],
                    },
                    "sport": {
                        "type": "string",
                        "description": "Sport to query (defaults to nfl)",
                    },
                    "lookback_hours": {
                        "type": "integer",
                        "description": "Trailing window in hours (defaults to 24)",
                        "minimum": 1,
                        "maximum": 168,
                    },
                    "limit": {
                        "type": "integer",
                        "description": "Maximum players to return (defaults to 25)",
                        "minimum": 1,
                        "maximum": 200,
                    },
                },
                "required": ["trend_type"],
            }),
        }
    }
}

#[async_trait]
impl McpTool for GetTrendingPlayersTool {
    fn name(&self) -> &str {
        "get_trending_players"
    }

    fn description(&self) -> &str {
        "Get the most added or dropped players over a trailing window"
    }

    fn input_schema(&self) -> &Value {
        &self.schema
    }

    async fn execute(&self, arguments: Map<String, Value>) -> Result<CallToolResult, McpError> {
        let trend_type = require_str(&arguments, "trend_type")?;
        let sport = optional_str(&arguments, "sport", "nfl");
        let lookback_hours = optional_u32(&arguments, "lookback_hours", 24);
        let limit = optional_u32(&arguments, "limit", 25);
        let trending = self
            .client
            .trending_players(&sport, &trend_type, lookback_hours, limit)
            .await?;
        Ok(CallToolResult::json(&trending))
    }
}

/// Build an avatar CDN URL. Deterministic, no upstream call.
pub struct GetAvatarTool {
    cdn_base_url: String,
    schema: Value,
}

impl GetAvatarTool {
    pub fn new(cdn_base_url: String) -> Self {
        Self {
            cdn_base_url,
            schema: json!({
                "type": "object",
                "properties": {
                    "avatar_id": {
                        "type": "string",
                        "description": "Avatar id from a user or league record",
                    },
                    "size": {
                        "type": "string",
                        "description": "Image size (defaults to full)",
                        "enum": ["thumb", "full"],
                    },
                },
                "required": ["avatar_id"],
            }),
        }
    }

    fn avatar_url(&self, avatar_id: &str, size: &str) -> String {
        if size == "thumb" {
            format!("{}/avatars/thumbs/{}", self.cdn_base_url, avatar_id)
        } else {
            format!("{}/avatars/{}", self.cdn_base_url, avatar_id)
        }
    }
}

#[async_trait]
impl McpTool for GetAvatarTool {
    fn name(&self) -> &str {
        "get_avatar"
    }

    fn description(&self) -> &str {
        "Get the CDN URL for an avatar, full-size or thumbnail"
    }

    fn input_schema(&self) -> &Value {
        &self.schema
    }

    async fn execute(&self, arguments: Map<String, Value>) -> Result<CallToolResult, McpError> {
        let avatar_id = require_str(&arguments, "avatar_id")?;
        let size = optional_str(&arguments, "size", "full");
        Ok(CallToolResult::text(self.avatar_url(&avatar_id, &size)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn avatar_urls_by_size() {
        let tool = GetAvatarTool::new("https://sleepercdn.com".to_owned());
        assert_eq!(
            tool.avatar_url("abc123", "thumb"),
            "https://sleepercdn.com/avatars/thumbs/abc123"
        );
        assert_eq!(
            tool.avatar_url("abc123", "full"),
            "https://sleepercdn.com/avatars/abc123"
        );
    }
}
