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

//! Domain data for the Huddle MCP server: the bundled Sleeper player
//! directory and the roster/matchup enrichment pass that rewrites opaque
//! player ids into human-readable names.

pub mod enrich;
pub mod players;

pub use enrich::{enrich_matchups, enrich_rosters, EnrichError};
pub use players::{PlayerDirectory, PlayerRecord, PlayersError, BUNDLED_PLAYERS_JSON};
