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

//! Roster and matchup enrichment.
//!
//! Upstream payloads carry opaque player ids. Enrichment rewrites the id
//! lists (`players`, `starters`, `keepers`) into display names, and for
//! matchups converts the positional `starters_points` array into a
//! name -> points map zipped against the pre-enrichment starter order.
//! Callers keep ownership of their payloads; enrichment always works on
//! clones.

use crate::players::PlayerDirectory;
use serde_json::{Map, Value};
use thiserror::Error;

/// Fields whose entries are player ids.
const ID_LIST_FIELDS: [&str; 3] = ["players", "starters", "keepers"];

#[derive(Debug, Error)]
pub enum EnrichError {
    #[error("starters_points has {points} entries but starters has {starters}")]
    PointsMismatch { starters: usize, points: usize },
}

/// Replace player ids with display names in each roster payload.
pub fn enrich_rosters(directory: &PlayerDirectory, rosters: &[Value]) -> Vec<Value> {
    rosters
        .iter()
        .map(|roster| {
            let mut roster = roster.clone();
            if let Some(obj) = roster.as_object_mut() {
                rewrite_id_lists(directory, obj);
            }
            roster
        })
        .collect()
}

/// Replace player ids with display names in each matchup payload and fold
/// the positional points arrays into name-keyed maps.
pub fn enrich_matchups(
    directory: &PlayerDirectory,
    matchups: &[Value],
) -> Result<Vec<Value>, EnrichError> {
    matchups
        .iter()
        .map(|matchup| {
            let mut matchup = matchup.clone();
            if let Some(obj) = matchup.as_object_mut() {
                // Capture the starter order before any rewriting; the points
                // array is positional against this order.
                let starters: Vec<String> = obj
                    .get("starters")
                    .and_then(Value::as_array)
                    .map(|items| {
                        items
                            .iter()
                            .filter_map(Value::as_str)
                            .map(str::to_owned)
                            .collect()
                    })
                    .unwrap_or_default();

                if let Some(points) = obj.get("starters_points").and_then(Value::as_array).cloned() {
                    if points.len() != starters.len() {
                        return Err(EnrichError::PointsMismatch {
                            starters: starters.len(),
                            points: points.len(),
                        });
                    }
                    let by_name: Map<String, Value> = starters
                        .iter()
                        .zip(points)
                        .map(|(id, pts)| (directory.display_name(id).to_owned(), pts))
                        .collect();
                    obj.insert("starters_points".to_owned(), Value::Object(by_name));
                }

                if let Some(points) = obj.get("players_points").and_then(Value::as_object).cloned() {
                    let by_name: Map<String, Value> = points
                        .into_iter()
                        .map(|(id, pts)| (directory.display_name(&id).to_owned(), pts))
                        .collect();
                    obj.insert("players_points".to_owned(), Value::Object(by_name));
                }

                rewrite_id_lists(directory, obj);
            }
            Ok(matchup)
        })
        .collect()
}

fn rewrite_id_lists(directory: &PlayerDirectory, obj: &mut Map<String, Value>) {
    for field in ID_LIST_FIELDS {
        if let Some(Value::Array(items)) = obj.get_mut(field) {
            for item in items.iter_mut() {
                if let Some(id) = item.as_str() {
                    *item = Value::String(directory.display_name(id).to_owned());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::players::PlayerRecord;
    use serde_json::json;

    fn directory() -> PlayerDirectory {
        PlayerDirectory::from_records([
            PlayerRecord {
                player_id: "4046".into(),
                full_name: "Patrick Mahomes".into(),
                number: Some(15),
                weight: None,
                height: None,
                age: None,
                fantasy_positions: vec!["QB".into()],
            },
            PlayerRecord {
                player_id: "5849".into(),
                full_name: "Kyler Murray".into(),
                number: Some(1),
                weight: None,
                height: None,
                age: None,
                fantasy_positions: vec!["QB".into()],
            },
        ])
    }

    #[test]
    fn roster_ids_become_names_and_defense_codes_pass_through() {
        let rosters = vec![json!({
            "roster_id": 1,
            "players": ["4046", "CLE"],
            "starters": ["4046"],
            "keepers": ["CLE"],
        })];

        let enriched = enrich_rosters(&directory(), &rosters);
        assert_eq!(enriched[0]["players"], json!(["Patrick Mahomes", "CLE"]));
        assert_eq!(enriched[0]["starters"], json!(["Patrick Mahomes"]));
        assert_eq!(enriched[0]["keepers"], json!(["CLE"]));
        // The input is untouched.
        assert_eq!(rosters[0]["players"], json!(["4046", "CLE"]));
    }

    #[test]
    fn matchup_points_zip_against_original_starter_order() {
        let matchups = vec![json!({
            "matchup_id": 3,
            "starters": ["4046", "5849"],
            "starters_points": [24.5, 10.2],
            "players": ["4046", "5849"],
            "players_points": {"4046": 24.5, "5849": 10.2},
        })];

        let enriched = enrich_matchups(&directory(), &matchups).unwrap();
        assert_eq!(
            enriched[0]["starters_points"],
            json!({"Patrick Mahomes": 24.5, "Kyler Murray": 10.2})
        );
        assert_eq!(
            enriched[0]["players_points"],
            json!({"Patrick Mahomes": 24.5, "Kyler Murray": 10.2})
        );
        assert_eq!(
            enriched[0]["starters"],
            json!(["Patrick Mahomes", "Kyler Murray"])
        );
        assert_eq!(enriched[0]["matchup_id"], json!(3));
    }

    #[test]
    fn points_length_mismatch_is_an_error() {
        let matchups = vec![json!({
            "starters": ["4046", "5849"],
            "starters_points": [24.5],
        })];

        let err = enrich_matchups(&directory(), &matchups).unwrap_err();
        assert!(matches!(
            err,
            EnrichError::PointsMismatch { starters: 2, points: 1 }
        ));
    }

    #[test]
    fn unknown_starter_keeps_its_id_as_points_key() {
        let matchups = vec![json!({
            "starters": ["4046", "DEN"],
            "starters_points": [24.5, 8.0],
        })];

        let enriched = enrich_matchups(&directory(), &matchups).unwrap();
        assert_eq!(
            enriched[0]["starters_points"],
            json!({"Patrick Mahomes": 24.5, "DEN": 8.0})
        );
    }

    #[test]
    fn payloads_without_id_fields_pass_through() {
        let matchups = vec![json!({"matchup_id": 1, "points": 101.2})];
        let enriched = enrich_matchups(&directory(), &matchups).unwrap();
        assert_eq!(enriched, matchups);
    }
}
