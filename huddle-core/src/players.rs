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

//! Static player directory.
//!
//! The directory is deserialized once at startup from a dataset bundled into
//! the binary and is never mutated afterwards, so concurrent readers need no
//! synchronization. Defense/special-teams units ("CLE", "SF", ...) are not
//! present in the dataset; their ids pass through lookups unchanged.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// The bundled player dataset, pre-filtered offline from the full Sleeper
/// `/players/nfl` dump down to the fields the server needs.
pub const BUNDLED_PLAYERS_JSON: &str = include_str!("../data/sleeper_players_def.json");

/// One player entry from the bundled dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub player_id: String,
    pub full_name: String,
    #[serde(default)]
    pub number: Option<u32>,
    #[serde(default)]
    pub weight: Option<String>,
    #[serde(default)]
    pub height: Option<String>,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub fantasy_positions: Vec<String>,
}

#[derive(Debug, Error)]
pub enum PlayersError {
    #[error("player dataset is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Read-only id -> player lookup table.
#[derive(Debug, Clone, Default)]
pub struct PlayerDirectory {
    players: HashMap<String, PlayerRecord>,
}

impl PlayerDirectory {
    /// Load the directory from the dataset bundled into the binary.
    pub fn bundled() -> Result<Self, PlayersError> {
        Self::from_json(BUNDLED_PLAYERS_JSON)
    }

    /// Load a directory from a JSON object keyed by player id.
    pub fn from_json(json: &str) -> Result<Self, PlayersError> {
        let players: HashMap<String, PlayerRecord> = serde_json::from_str(json)?;
        Ok(Self { players })
    }

    /// Build a directory from records, keyed by their `player_id`.
    pub fn from_records(records: impl IntoIterator<Item = PlayerRecord>) -> Self {
        let players = records
            .into_iter()
            .map(|r| (r.player_id.clone(), r))
            .collect();
        Self { players }
    }

    pub fn get(&self, player_id: &str) -> Option<&PlayerRecord> {
        self.players.get(player_id)
    }

    /// The player's full name when the id is known, otherwise the id itself.
    pub fn display_name<'a>(&'a self, player_id: &'a str) -> &'a str {
        self.players
            .get(player_id)
            .map(|p| p.full_name.as_str())
            .unwrap_or(player_id)
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_dataset_parses() {
        let dir = PlayerDirectory::bundled().unwrap();
        assert!(!dir.is_empty());
        assert_eq!(dir.display_name("4046"), "Patrick Mahomes");
    }

    #[test]
    fn unknown_ids_pass_through() {
        let dir = PlayerDirectory::bundled().unwrap();
        assert_eq!(dir.display_name("CLE"), "CLE");
        assert_eq!(dir.display_name("999999"), "999999");
        assert!(dir.get("CLE").is_none());
    }

    #[test]
    fn record_fields_survive_deserialization() {
        let dir = PlayerDirectory::bundled().unwrap();
        let mahomes = dir.get("4046").unwrap();
        assert_eq!(mahomes.number, Some(15));
        assert_eq!(mahomes.fantasy_positions, vec!["QB"]);
    }
}
