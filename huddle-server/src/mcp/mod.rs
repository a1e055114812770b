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

//! Model Context Protocol (MCP) server implementation.
//!
//! Exposes the Sleeper fantasy-football API to AI tools over JSON-RPC 2.0.
//! The protocol defines three primitives, all served here:
//!
//! - **Tools**: schema-validated actions (league, roster, matchup, user,
//!   player, and avatar lookups)
//! - **Prompts**: argument-checked analysis templates
//! - **Resources**: the bundled player directory
//!
//! One [`handler::McpHandler`] serves both transports: the stdio line
//! transport in [`transport`] and the HTTP/SSE session transport in
//! [`http`].

pub mod error;
pub mod handler;
pub mod http;
pub mod prompts;
pub mod protocol;
pub mod resource;
pub mod tools;
pub mod transport;

pub use error::McpError;
pub use handler::McpHandler;
pub use http::{HttpState, MCP_SESSION_HEADER};
pub use prompts::PromptRegistry;
pub use protocol::*;
pub use tools::{build_registry, McpTool, RegistrationError, ToolRegistry};
pub use transport::{serve, stdio, LineTransport, McpTransport, TransportError};
