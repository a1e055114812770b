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

//! The Sleeper tool catalog.

pub mod league;
pub mod player;
pub mod registry;
pub mod user;

pub use registry::{McpTool, RegistrationError, ToolRegistry};

use crate::config::ServerConfig;
use crate::mcp::error::McpError;
use crate::sleeper::SleeperClient;
use huddle_core::PlayerDirectory;
use serde_json::{Map, Value};
use std::sync::Arc;

/// Register every tool. Duplicate names or a malformed schema fail startup.
pub fn build_registry(
    client: Arc<SleeperClient>,
    directory: Arc<PlayerDirectory>,
    config: &ServerConfig,
) -> Result<ToolRegistry, RegistrationError> {
    let mut registry = ToolRegistry::new();

    registry.register(Arc::new(league::GetLeagueIdTool::new(
        config.league_id.clone(),
    )))?;
    registry.register(Arc::new(league::GetLeagueTool::new(client.clone())))?;
    registry.register(Arc::new(league::GetLeagueRostersTool::new(
        client.clone(),
        directory.clone(),
    )))?;
    registry.register(Arc::new(league::GetLeagueUsersTool::new(client.clone())))?;
    registry.register(Arc::new(league::GetLeagueMatchupsTool::new(
        client.clone(),
        directory.clone(),
    )))?;
    registry.register(Arc::new(league::GetPlayoffBracketTool::new(client.clone())))?;
    registry.register(Arc::new(league::GetTransactionsTool::new(client.clone())))?;
    registry.register(Arc::new(league::GetTradedPicksTool::new(client.clone())))?;
    registry.register(Arc::new(user::GetUserByIdTool::new(client.clone())))?;
    registry.register(Arc::new(user::GetUserByUsernameTool::new(client.clone())))?;
    registry.register(Arc::new(player::GetPlayerTool::new(directory)))?;
    registry.register(Arc::new(player::GetTrendingPlayersTool::new(client)))?;
    registry.register(Arc::new(player::GetAvatarTool::new(
        config.cdn_base_url.clone(),
    )))?;

    Ok(registry)
}

// Argument extraction for already-validated argument objects. The schema
// guarantees presence and type; these guard against drift between a tool's
// schema and its extraction code.

pub(crate) fn require_str(args: &Map<String, Value>, key: &str) -> Result<String, McpError> {
    args.get(key)
        .and_then(Value::as_str)
        .map(str::to_owned)
        .ok_or_else(|| McpError::InvalidParams(format!("{key} is required")))
}

pub(crate) fn require_u8(args: &Map<String, Value>, key: &str) -> Result<u8, McpError> {
    args.get(key)
        .and_then(Value::as_u64)
        .and_then(|n| u8::try_from(n).ok())
        .ok_or_else(|| McpError::InvalidParams(format!("{key} is required")))
}

pub(crate) fn optional_str(args: &Map<String, Value>, key: &str, default: &str) -> String {
    args.get(key)
        .and_then(Value::as_str)
        .unwrap_or(default)
        .to_owned()
}

pub(crate) fn optional_u32(args: &Map<String, Value>, key: &str, default: u32) -> u32 {
    args.get(key)
        .and_then(Value::as_u64)
        .and_then(|n| u32::try_from(n).ok())
        .unwrap_or(default)
}
