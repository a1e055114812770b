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

//! The server's one resource: the bundled player dataset, served verbatim.

use crate::mcp::error::McpError;
use crate::mcp::protocol::{ReadResourceResult, Resource, ResourceContent};
use huddle_core::BUNDLED_PLAYERS_JSON;

pub const PLAYERS_RESOURCE_URI: &str = "file://sleeper_players_def.json";

pub fn list() -> Vec<Resource> {
    vec![Resource {
        uri: PLAYERS_RESOURCE_URI.to_string(),
        name: "Sleeper player directory".to_string(),
        description: Some(
            "Bundled NFL player lookup table: id, name, number, measurements, positions"
                .to_string(),
        ),
        mime_type: Some("application/json".to_string()),
    }]
}

pub fn read(uri: &str) -> Result<ReadResourceResult, McpError> {
    if uri != PLAYERS_RESOURCE_URI {
        return Err(McpError::InvalidParams(format!("Unknown resource URI: {uri}")));
    }

    Ok(ReadResourceResult {
        contents: vec![ResourceContent {
            uri: uri.to_string(),
            mime_type: Some("application/json".to_string()),
            text: Some(BUNDLED_PLAYERS_JSON.to_string()),
            blob: None,
        }],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_round_trips_the_bundled_bytes() {
        let result = read(PLAYERS_RESOURCE_URI).unwrap();
        assert_eq!(result.contents[0].text.as_deref(), Some(BUNDLED_PLAYERS_JSON));
        assert_eq!(
            result.contents[0].mime_type.as_deref(),
            Some("application/json")
        );
    }

    #[test]
    fn unknown_uri_is_invalid_params() {
        let err = read("file://other.json").unwrap_err();
        assert!(matches!(err, McpError::InvalidParams(_)));
    }
}
