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

//! Prompt templates for fantasy-football analysis.
//!
//! Generation is pure template substitution. Required arguments and
//! enumerated values are checked up front; every violation is collected
//! into a single `InvalidParams` message.

use crate::mcp::error::McpError;
use crate::mcp::protocol::{
    GetPromptResult, Prompt, PromptArgument, PromptContent, PromptMessage, PromptRole,
};
use std::collections::HashMap;

/// The immutable prompt table. Built once at startup.
pub struct PromptRegistry {
    prompts: Vec<Prompt>,
}

impl Default for PromptRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl PromptRegistry {
    pub fn new() -> Self {
        Self {
            prompts: vec![
                Prompt {
                    name: "analyze_roster".to_string(),
                    description: Some(
                        "Review a roster's strengths, weaknesses, and lineup decisions".to_string(),
                    ),
                    arguments: Some(vec![
                        PromptArgument {
                            name: "league_id".to_string(),
                            description: Some("Sleeper league id".to_string()),
                            required: Some(true),
                            allowed: None,
                        },
                        PromptArgument {
                            name: "roster_id".to_string(),
                            description: Some("Roster id within the league".to_string()),
                            required: Some(true),
                            allowed: None,
                        },
                    ]),
                },
                Prompt {
                    name: "matchup_preview".to_string(),
                    description: Some(
                        "Preview a week's matchup with projected strengths on both sides"
                            .to_string(),
                    ),
                    arguments: Some(vec![
                        PromptArgument {
                            name: "league_id".to_string(),
                            description: Some("Sleeper league id".to_string()),
                            required: Some(true),
                            allowed: None,
                        },
                        PromptArgument {
                            name: "week".to_string(),
                            description: Some("NFL week number (1-18)".to_string()),
                            required: Some(true),
                            allowed: None,
                        },
                    ]),
                },
                Prompt {
                    name: "waiver_targets".to_string(),
                    description: Some(
                        "Suggest waiver-wire pickups from trending player data".to_string(),
                    ),
                    arguments: Some(vec![PromptArgument {
                        name: "position".to_string(),
                        description: Some("Limit suggestions to one position".to_string()),
                        required: Some(false),
                        allowed: Some(
                            ["QB", "RB", "WR", "TE", "K", "DEF"]
                                .map(str::to_string)
                                .to_vec(),
                        ),
                    }]),
                },
                Prompt {
                    name: "trade_review".to_string(),
                    description: Some("Evaluate a proposed trade from both sides".to_string()),
                    arguments: Some(vec![
                        PromptArgument {
                            name: "offered".to_string(),
                            description: Some("Players offered away, comma separated".to_string()),
                            required: Some(true),
                            allowed: None,
                        },
                        PromptArgument {
                            name: "requested".to_string(),
                            description: Some(
                                "Players asked for in return, comma separated".to_string(),
                            ),
                            required: Some(true),
                            allowed: None,
                        },
                    ]),
                },
            ],
        }
    }

    pub fn list(&self) -> Vec<Prompt> {
        self.prompts.clone()
    }

    /// Validate `args` against the prompt's definition and render it.
    pub fn generate(
        &self,
        name: &str,
        args: &HashMap<String, String>,
    ) -> Result<GetPromptResult, McpError> {
        let prompt = self
            .prompts
            .iter()
            .find(|p| p.name == name)
            .ok_or_else(|| McpError::MethodNotFound(name.to_string()))?;

        let mut violations = Vec::new();
        for argument in prompt.arguments.iter().flatten() {
            match args.get(&argument.name) {
                None => {
                    if argument.required == Some(true) {
                        violations.push(format!("missing required argument: {}", argument.name));
                    }
                }
                Some(value) => {
                    if let Some(allowed) = &argument.allowed {
                        if !allowed.contains(value) {
                            violations.push(format!(
                                "{} must be one of {}",
                                argument.name,
                                allowed.join(", ")
                            ));
                        }
                    }
                }
            }
        }
        if !violations.is_empty() {
            return Err(McpError::InvalidParams(violations.join("; ")));
        }

        Ok(render(name, args))
    }
}

fn render(name: &str, args: &HashMap<String, String>) -> GetPromptResult {
    let get = |key: &str| args.get(key).cloned().unwrap_or_default();

    let (description, text) = match name {
        "analyze_roster" => (
            "Roster analysis",
            format!(
                "Analyze roster {} in league {}.\n\n\
                 Use get_league_rosters and get_league to pull the roster and \
                 scoring settings, then provide:\n\
                 1. Positional strengths and weaknesses\n\
                 2. Start/sit calls that look wrong\n\
                 3. Bench players worth stashing or cutting",
                get("roster_id"),
                get("league_id")
            ),
        ),
        "matchup_preview" => (
            "Matchup preview",
            format!(
                "Preview the week {} matchups in league {}.\n\n\
                 Use get_league_matchups for the starters and points on each \
                 side, then for each matchup provide:\n\
                 1. The projected closest matchup\n\
                 2. The players most likely to swing it\n\
                 3. A one-line prediction",
                get("week"),
                get("league_id")
            ),
        ),
        "waiver_targets" => {
            let scope = match args.get("position") {
                Some(position) => format!(" at {position}"),
                None => String::new(),
            };
            (
                "Waiver-wire suggestions",
                format!(
                    "Suggest waiver-wire pickups{scope}.\n\n\
                     Use get_trending_players with trend_type \"add\" to see what \
                     the market is chasing and trend_type \"drop\" for falling \
                     players, then provide:\n\
                     1. Three adds ranked by expected rest-of-season value\n\
                     2. One player being dropped too early\n\
                     3. Who to cut to make room"
                ),
            )
        }
        // Registry lookup precedes rendering, so this is the last prompt.
        _ => (
            "Trade evaluation",
            format!(
                "Evaluate this trade: giving {} for {}.\n\n\
                 Use get_player for each name to compare roles and ages, then \
                 provide:\n\
                 1. Which side wins now and which wins rest-of-season\n\
                 2. A fair counter-offer if the trade is lopsided",
                get("offered"),
                get("requested")
            ),
        ),
    };

    GetPromptResult {
        description: Some(description.to_string()),
        messages: vec![PromptMessage {
            role: PromptRole::User,
            content: PromptContent::Text { text },
        }],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_prompt_is_method_not_found() {
        let registry = PromptRegistry::new();
        let err = registry.generate("nonexistent", &HashMap::new()).unwrap_err();
        assert!(matches!(err, McpError::MethodNotFound(_)));
    }

    #[test]
    fn missing_required_arguments_are_all_named() {
        let registry = PromptRegistry::new();
        let err = registry.generate("trade_review", &HashMap::new()).unwrap_err();
        match err {
            McpError::InvalidParams(msg) => {
                assert!(msg.contains("offered"), "got: {msg}");
                assert!(msg.contains("requested"), "got: {msg}");
            }
            other => panic!("expected InvalidParams, got {other:?}"),
        }
    }

    #[test]
    fn enumerated_values_are_enforced() {
        let registry = PromptRegistry::new();
        let args = HashMap::from([("position".to_string(), "GOALIE".to_string())]);
        let err = registry.generate("waiver_targets", &args).unwrap_err();
        assert!(matches!(err, McpError::InvalidParams(_)));

        let args = HashMap::from([("position".to_string(), "RB".to_string())]);
        let result = registry.generate("waiver_targets", &args).unwrap();
        assert_eq!(result.messages.len(), 1);
    }

    #[test]
    fn arguments_are_substituted() {
        let registry = PromptRegistry::new();
        let args = HashMap::from([
            ("league_id".to_string(), "12345".to_string()),
            ("week".to_string(), "7".to_string()),
        ]);
        let result = registry.generate("matchup_preview", &args).unwrap();
        let PromptContent::Text { text } = &result.messages[0].content;
        assert!(text.contains("week 7"));
        assert!(text.contains("league 12345"));
    }
}
