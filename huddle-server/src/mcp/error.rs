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

//! Protocol-facing error taxonomy.
//!
//! Three kinds cover every dispatch failure. Validation problems are
//! converted to `InvalidParams` at the dispatch boundary; upstream and
//! unexpected failures become `Internal` with the original message kept as
//! context. Errors that are already typed pass through unchanged.

use crate::mcp::protocol::JsonRpcError;
use crate::sleeper::SleeperError;
use huddle_core::EnrichError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum McpError {
    #[error("Method not found: {0}")]
    MethodNotFound(String),
    #[error("{0}")]
    InvalidParams(String),
    #[error("{0}")]
    Internal(String),
}

impl McpError {
    pub fn code(&self) -> i32 {
        match self {
            McpError::MethodNotFound(_) => -32601,
            McpError::InvalidParams(_) => -32602,
            McpError::Internal(_) => -32603,
        }
    }
}

impl From<McpError> for JsonRpcError {
    fn from(err: McpError) -> Self {
        JsonRpcError {
            code: err.code(),
            message: err.to_string(),
            data: None,
        }
    }
}

impl From<SleeperError> for McpError {
    fn from(err: SleeperError) -> Self {
        McpError::Internal(err.to_string())
    }
}

impl From<EnrichError> for McpError {
    fn from(err: EnrichError) -> Self {
        McpError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_match_jsonrpc() {
        assert_eq!(McpError::MethodNotFound("x".into()).code(), -32601);
        assert_eq!(McpError::InvalidParams("x".into()).code(), -32602);
        assert_eq!(McpError::Internal("x".into()).code(), -32603);
    }

    #[test]
    fn upstream_errors_become_internal() {
        let err: McpError = SleeperError::Status {
            status: 500,
            reason: "Internal Server Error".into(),
        }
        .into();
        assert!(matches!(err, McpError::Internal(_)));
        assert_eq!(
            err.to_string(),
            "API request failed: 500 Internal Server Error"
        );
    }
}
