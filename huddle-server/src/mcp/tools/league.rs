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

//! League tools: league metadata, rosters, users, matchups, playoff
//! brackets, transactions, and traded picks.

use super::registry::McpTool;
use super::{require_str, require_u8};
use crate::mcp::error::McpError;
use crate::mcp::protocol::CallToolResult;
use crate::sleeper::SleeperClient;
use async_trait::async_trait;
use huddle_core::{enrich_matchups, enrich_rosters, PlayerDirectory};
use serde_json::{json, Map, Value};
use std::sync::Arc;

fn league_id_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "league_id": {
                "type": "string",
                "description": "Sleeper league id",
            },
        },
        "required": ["league_id"],
    })
}

/// Returns the league id the server was configured with. No upstream call.
pub struct GetLeagueIdTool {
    league_id: String,
    schema: Value,
}

impl GetLeagueIdTool {
    pub fn new(league_id: String) -> Self {
        Self {
            league_id,
            schema: json!({"type": "object", "properties": {}}),
        }
    }
}

#[async_trait]
impl McpTool for GetLeagueIdTool {
    fn name(&self) -> &str {
        "get_league_id"
    }

    fn description(&self) -> &str {
        "Get the league id this server is configured to use by default"
    }

    fn input_schema(&self) -> &Value {
        &self.schema
    }

    async fn execute(&self, _arguments: Map<String, Value>) -> Result<CallToolResult, McpError> {
        Ok(CallToolResult::text(self.league_id.clone()))
    }
}

pub struct GetLeagueTool {
    client: Arc<SleeperClient>,
    schema: Value,
}

impl GetLeagueTool {
    pub fn new(client: Arc<SleeperClient>) -> Self {
        Self {
            client,
            schema: league_id_schema(),
        }
    }
}

#[async_trait]
impl McpTool for GetLeagueTool {
    fn name(&self) -> &str {
        "get_league"
    }

    fn description(&self) -> &str {
        "Get a league's settings, scoring, and status"
    }

    fn input_schema(&self) -> &Value {
        &self.schema
    }

    async fn execute(&self, arguments: Map<String, Value>) -> Result<CallToolResult, McpError> {
        let league_id = require_str(&arguments, "league_id")?;
        let league = self.client.league(&league_id).await?;
        Ok(CallToolResult::json(&league))
    }
}

/// Rosters with player ids rewritten to display names.
pub struct GetLeagueRostersTool {
    client: Arc<SleeperClient>,
    directory: Arc<PlayerDirectory>,
    schema: Value,
}

impl GetLeagueRostersTool {
    pub fn new(client: Arc<SleeperClient>, directory: Arc<PlayerDirectory>) -> Self {
        Self {
            client,
            directory,
            schema: league_id_schema(),
        }
    }
}

#[async_trait]
impl McpTool for GetLeagueRostersTool {
    fn name(&self) -> &str {
        "get_league_rosters"
    }

    fn description(&self) -> &str {
        "Get all rosters in a league, with player ids resolved to names"
    }

    fn input_schema(&self) -> &Value {
        &self.schema
    }

    async fn execute(&self, arguments: Map<String, Value>) -> Result<CallToolResult, McpError> {
        let league_id = require_str(&arguments, "league_id")?;
        let enriched = match self.client.league_rosters(&league_id).await? {
            Value::Array(items) => Value::Array(enrich_rosters(&self.directory, &items)),
            other => other,
        };
        Ok(CallToolResult::json(&enriched))
    }
}

pub struct GetLeagueUsersTool {
    client: Arc<SleeperClient>,
    schema: Value,
}

impl GetLeagueUsersTool {
    pub fn new(client: Arc<SleeperClient>) -> Self {
        Self {
            client,
            schema: league_id_schema(),
        }
    }
}

#[async_trait]
impl McpTool for GetLeagueUsersTool {
    fn name(&self) -> &str {
        "get_league_users"
    }

    fn description(&self) -> &str {
        "Get all users in a league"
    }

    fn input_schema(&self) -> &Value {
        &self.schema
    }

    async fn execute(&self, arguments: Map<String, Value>) -> Result<CallToolResult, McpError> {
        let league_id = require_str(&arguments, "league_id")?;
        let users = self.client.league_users(&league_id).await?;
        Ok(CallToolResult::json(&users))
    }
}

/// Weekly matchups with starter/player points keyed by resolved names.
pub struct GetLeagueMatchupsTool {
    client: Arc<SleeperClient>,
    directory: Arc<PlayerDirectory>,
    schema: Value,
}

impl GetLeagueMatchupsTool {
    pub fn new(client: Arc<SleeperClient>, directory: Arc<PlayerDirectory>) -> Self {
        Self {
            client,
            directory,
            schema: json!({
                "type": "object",
                "properties": {
                    "league_id": {
                        "type": "string",
                        "description": "Sleeper league id",
                    },
                    "week": {
                        "type": "integer",
                        "description": "NFL week number",
                        "minimum": 1,
                        "maximum": 18,
                    },
                },
                "required": ["league_id", "week"],
            }),
        }
    }
}

#[async_trait]
impl McpTool for GetLeagueMatchupsTool {
    fn name(&self) -> &str {
        "get_league_matchups"
    }

    fn description(&self) -> &str {
        "Get a league's matchups for a week, with points keyed by player name"
    }

    fn input_schema(&self) -> &Value {
        &self.schema
    }

    async fn execute(&self, arguments: Map<String, Value>) -> Result<CallToolResult, McpError> {
        let league_id = require_str(&arguments, "league_id")?;
        let week = require_u8(&arguments, "week")?;
        let enriched = match self.client.league_matchups(&league_id, week).await? {
            Value::Array(items) => Value::Array(enrich_matchups(&self.directory, &items)?),
            other => other,
        };
        Ok(CallToolResult::json(&enriched))
    }
}

pub struct GetPlayoffBracketTool {
    client: Arc<SleeperClient>,
    schema: Value,
}

impl GetPlayoffBracketTool {
    pub fn new(client: Arc<SleeperClient>) -> Self {
        Self {
            client,
            schema: json!({
                "type": "object",
                "properties": {
                    "league_id": {
                        "type": "string",
                        "description": "Sleeper league id",
                    },
                    "bracket_type": {
                        "type": "string",
                        "description": "Which bracket to fetch",
                        "enum": ["winners", "losers"],
                    },
                },
                "required": ["league_id", "bracket_type"],
            }),
        }
    }
}

#[async_trait]
impl McpTool for GetPlayoffBracketTool {
    fn name(&self) -> &str {
        "get_playoff_bracket"
    }

    fn description(&self) -> &str {
        "Get a league's winners or losers playoff bracket"
    }

    fn input_schema(&self) -> &Value {
        &self.schema
    }

    async fn execute(&self, arguments: Map<String, Value>) -> Result<CallToolResult, McpError> {
        let league_id = require_str(&arguments, "league_id")?;
        let bracket_type = require_str(&arguments, "bracket_type")?;
        let bracket = match bracket_type.as_str() {
            "winners" => self.client.winners_bracket(&league_id).await?,
            _ => self.client.losers_bracket(&league_id).await?,
        };
        Ok(CallToolResult::json(&bracket))
    }
}

pub struct GetTransactionsTool {
    client: Arc<SleeperClient>,
    schema: Value,
}

impl GetTransactionsTool {
    pub fn new(client: Arc<SleeperClient>) -> Self {
        Self {
            client,
            schema: json!({
                "type": "object",
                "properties": {
                    "league_id": {
                        "type": "string",
                        "description": "Sleeper league id",
                    },
                    "round": {
                        "type": "integer",
                        "description": "Week to fetch transactions for",
                        "minimum": 1,
                        "maximum": 18,
                    },
                },
                "required": ["league_id", "round"],
            }),
        }
    }
}

#[async_trait]
impl McpTool for GetTransactionsTool {
    fn name(&self) -> &str {
        "get_transactions"
    }

    fn description(&self) -> &str {
        "Get a league's transactions (trades, waivers, free agents) for a week"
    }

    fn input_schema(&self) -> &Value {
        &self.schema
    }

    async fn execute(&self, arguments: Map<String, Value>) -> Result<CallToolResult, McpError> {
        let league_id = require_str(&arguments, "league_id")?;
        let round = require_u8(&arguments, "round")?;
        let transactions = self.client.transactions(&league_id, round).await?;
        Ok(CallToolResult::json(&transactions))
    }
}

pub struct GetTradedPicksTool {
    client: Arc<SleeperClient>,
    schema: Value,
}

impl GetTradedPicksTool {
    pub fn new(client: Arc<SleeperClient>) -> Self {
        Self {
            client,
            schema: league_id_schema(),
        }
    }
}

#[async_trait]
impl McpTool for GetTradedPicksTool {
    fn name(&self) -> &str {
        "get_traded_picks"
    }

    fn description(&self) -> &str {
        "Get all traded draft picks in a league"
    }

    fn input_schema(&self) -> &Value {
        &self.schema
    }

    async fn execute(&self, arguments: Map<String, Value>) -> Result<CallToolResult, McpError> {
        let league_id = require_str(&arguments, "league_id")?;
        let picks = self.client.traded_picks(&league_id).await?;
        Ok(CallToolResult::json(&picks))
    }
}
