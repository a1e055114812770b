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

pub mod config;
pub mod mcp;
pub mod sleeper;

use anyhow::Result;
use config::ServerConfig;
use huddle_core::PlayerDirectory;
use mcp::{HttpState, McpHandler, PromptRegistry};
use sleeper::SleeperClient;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Wire up the player directory, upstream client, and registries into one
/// handler shared by every transport.
pub fn build_handler(config: &ServerConfig) -> Result<Arc<McpHandler>> {
    let directory = Arc::new(PlayerDirectory::bundled()?);
    let client = Arc::new(SleeperClient::new(
        config.api_base_url.clone(),
        Duration::from_millis(config.rate_limit_ms),
    ));
    let tools = mcp::build_registry(client, directory, config)?;

    Ok(Arc::new(McpHandler::new(tools, PromptRegistry::new())))
}

/// Serve MCP over stdin/stdout. Diagnostics go to stderr so the protocol
/// stream stays clean.
pub async fn run_stdio(config: ServerConfig) -> Result<()> {
    init_tracing();
    tracing::info!("Starting Huddle MCP server (stdio transport)");
    config.validate()?;

    let handler = build_handler(&config)?;
    mcp::serve(mcp::stdio(), handler).await?;
    Ok(())
}

/// Serve MCP over the HTTP streaming transport.
pub async fn run_http(config: ServerConfig) -> Result<()> {
    init_tracing();
    tracing::info!("Starting Huddle MCP server (HTTP transport)");
    config.validate()?;

    let handler = build_handler(&config)?;
    let state = Arc::new(HttpState::new(handler, config.allowed_origins.clone()));
    mcp::http::run(state, config.socket_addr()?).await
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "huddle_server=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
