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

//! Rate-limited client for the Sleeper HTTP API.
//!
//! All requests are unauthenticated GETs. Response bodies are passed through
//! as raw JSON; the upstream schema is not validated here. There are no
//! retries: a failed request fails the tool call that issued it.

use super::rate_limit::RateLimiter;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum SleeperError {
    #[error("API request failed: {status} {reason}")]
    Status { status: u16, reason: String },
    #[error("API request failed: {0}")]
    Http(#[from] reqwest::Error),
}

pub struct SleeperClient {
    http: reqwest::Client,
    base_url: String,
    limiter: RateLimiter,
}

impl SleeperClient {
    pub fn new(base_url: impl Into<String>, min_interval: Duration) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            limiter: RateLimiter::new(min_interval),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET `{base_url}{endpoint}` through the rate limiter and parse the
    /// body as JSON.
    pub async fn get(&self, endpoint: &str) -> Result<Value, SleeperError> {
        self.limiter.await_turn().await;

        let url = format!("{}{}", self.base_url, endpoint);
        debug!(%url, "sleeper request");

        let response = self.http.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SleeperError::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_owned(),
            });
        }

        Ok(response.json().await?)
    }

    pub async fn league(&self, league_id: &str) -> Result<Value, SleeperError> {
        self.get(&format!("/league/{league_id}")).await
    }

    pub async fn league_rosters(&self, league_id: &str) -> Result<Value, SleeperError> {
        self.get(&format!("/league/{league_id}/rosters")).await
    }

    pub async fn league_users(&self, league_id: &str) -> Result<Value, SleeperError> {
        self.get(&format!("/league/{league_id}/users")).await
    }

    pub async fn league_matchups(&self, league_id: &str, week: u8) -> Result<Value, SleeperError> {
        self.get(&format!("/league/{league_id}/matchups/{week}")).await
    }

    pub async fn winners_bracket(&self, league_id: &str) -> Result<Value, SleeperError> {
        self.get(&format!("/league/{league_id}/winners_bracket")).await
    }

    pub async fn losers_bracket(&self, league_id: &str) -> Result<Value, SleeperError> {
        self.get(&format!("/league/{league_id}/losers_bracket")).await
    }

    pub async fn transactions(&self, league_id: &str, round: u8) -> Result<Value, SleeperError> {
        self.get(&format!("/league/{league_id}/transactions/{round}")).await
    }

    pub async fn traded_picks(&self, league_id: &str) -> Result<Value, SleeperError> {
        self.get(&format!("/league/{league_id}/traded_picks")).await
    }

    /// `/user/{id}` and `/user/{username}` are the same upstream route.
    pub async fn user(&self, id_or_username: &str) -> Result<Value, SleeperError> {
        self.get(&format!("/user/{id_or_username}")).await
    }

    pub async fn trending_players(
        &self,
        sport: &str,
        trend_type: &str,
        lookback_hours: u32,
        limit: u32,
    ) -> Result<Value, SleeperError> {
        self.get(&format!(
            "/players/{sport}/trending/{trend_type}?lookback_hours={lookback_hours}&limit={limit}"
        ))
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_message_matches_upstream_wording() {
        let err = SleeperError::Status {
            status: 404,
            reason: "Not Found".to_owned(),
        };
        assert_eq!(err.to_string(), "API request failed: 404 Not Found");
    }
}
