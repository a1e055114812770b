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

use anyhow::Result;
use clap::{Parser, ValueEnum};
use huddle_server::{config::ServerConfig, run_http, run_stdio};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Transport {
    /// Newline-delimited JSON-RPC over stdin/stdout
    Stdio,
    /// JSON-RPC over HTTP with an SSE event stream
    Http,
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Transport to serve on
    #[arg(long, value_enum, default_value_t = Transport::Stdio)]
    transport: Transport,

    /// HTTP listen address (overrides config file)
    #[arg(long, env = "HUDDLE_HTTP_ADDR")]
    http_addr: Option<String>,

    /// Default league id (overrides config file)
    #[arg(long, env = "HUDDLE_LEAGUE_ID")]
    league_id: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration
    let mut config = ServerConfig::load(args.config)?;

    // Apply CLI overrides
    if let Some(addr) = args.http_addr {
        config.http_addr = addr;
    }
    if let Some(league_id) = args.league_id {
        config.league_id = league_id;
    }

    // Run server
    match args.transport {
        Transport::Stdio => run_stdio(config).await,
        Transport::Http => run_http(config).await,
    }
}
