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
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;

/// Huddle Server Configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Sleeper API base URL
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Sleeper CDN base URL for avatars
    #[serde(default = "default_cdn_base_url")]
    pub cdn_base_url: String,

    /// Minimum spacing between upstream requests, in milliseconds
    #[serde(default = "default_rate_limit_ms")]
    pub rate_limit_ms: u64,

    /// League id used when the caller doesn't name one
    #[serde(default = "default_league_id")]
    pub league_id: String,

    /// HTTP transport listen address
    #[serde(default = "default_http_addr")]
    pub http_addr: String,

    /// Origins admitted by the HTTP transport (empty = local origins only)
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

fn default_api_base_url() -> String {
    "https://api.sleeper.app/v1".to_string()
}

fn default_cdn_base_url() -> String {
    "https://sleepercdn.com".to_string()
}

fn default_rate_limit_ms() -> u64 {
    120
}

fn default_league_id() -> String {
    "1124831356770058240".to_string()
}

fn default_http_addr() -> String {
    "127.0.0.1:47300".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            cdn_base_url: default_cdn_base_url(),
            rate_limit_ms: default_rate_limit_ms(),
            league_id: default_league_id(),
            http_addr: default_http_addr(),
            allowed_origins: vec![],
        }
    }
}

impl ServerConfig {
    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration from environment variables
    ///
    /// Supported environment variables:
    /// - HUDDLE_API_BASE_URL: Sleeper API base URL
    /// - HUDDLE_CDN_BASE_URL: Sleeper CDN base URL
    /// - HUDDLE_RATE_LIMIT_MS: minimum upstream request spacing (default: 120)
    /// - HUDDLE_LEAGUE_ID: default league id
    /// - HUDDLE_HTTP_ADDR: HTTP transport listen address
    /// - HUDDLE_ALLOWED_ORIGINS: comma-separated origin allow-list
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(url) = std::env::var("HUDDLE_API_BASE_URL") {
            config.api_base_url = url;
        }
        if let Ok(url) = std::env::var("HUDDLE_CDN_BASE_URL") {
            config.cdn_base_url = url;
        }
        if let Ok(ms) = std::env::var("HUDDLE_RATE_LIMIT_MS") {
            if let Ok(val) = ms.parse() {
                config.rate_limit_ms = val;
            }
        }
        if let Ok(league_id) = std::env::var("HUDDLE_LEAGUE_ID") {
            config.league_id = league_id;
        }
        if let Ok(addr) = std::env::var("HUDDLE_HTTP_ADDR") {
            config.http_addr = addr;
        }
        if let Ok(origins) = std::env::var("HUDDLE_ALLOWED_ORIGINS") {
            config.allowed_origins = origins
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect();
        }

        config
    }

    /// Load configuration with priority: defaults < file < env
    pub fn load(config_file: Option<std::path::PathBuf>) -> Result<Self> {
        let config = if let Some(path) = config_file {
            if path.exists() {
                tracing::info!("Loading configuration from file: {:?}", path);
                Self::from_file(&path)?
            } else {
                tracing::warn!("Config file not found: {:?}, using defaults", path);
                Self::default()
            }
        } else {
            Self::default()
        };

        Ok(Self::merge_with_env(config))
    }

    /// Merge config with environment variables (env takes priority)
    fn merge_with_env(mut config: Self) -> Self {
        let env_config = Self::from_env();

        if std::env::var("HUDDLE_API_BASE_URL").is_ok() {
            config.api_base_url = env_config.api_base_url;
        }
        if std::env::var("HUDDLE_CDN_BASE_URL").is_ok() {
            config.cdn_base_url = env_config.cdn_base_url;
        }
        if std::env::var("HUDDLE_RATE_LIMIT_MS").is_ok() {
            config.rate_limit_ms = env_config.rate_limit_ms;
        }
        if std::env::var("HUDDLE_LEAGUE_ID").is_ok() {
            config.league_id = env_config.league_id;
        }
        if std::env::var("HUDDLE_HTTP_ADDR").is_ok() {
            config.http_addr = env_config.http_addr;
        }
        if std::env::var("HUDDLE_ALLOWED_ORIGINS").is_ok() {
            config.allowed_origins = env_config.allowed_origins;
        }

        config
    }

    /// Parse listen address as SocketAddr
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        Ok(self.http_addr.parse()?)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        self.socket_addr()?;

        if self.league_id.is_empty() {
            anyhow::bail!("league_id must not be empty");
        }
        if self.rate_limit_ms == 0 {
            anyhow::bail!("rate_limit_ms must be at least 1");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.api_base_url, "https://api.sleeper.app/v1");
        assert_eq!(config.cdn_base_url, "https://sleepercdn.com");
        assert_eq!(config.rate_limit_ms, 120);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn from_file_overrides_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "league_id = \"999\"\nrate_limit_ms = 250\nallowed_origins = [\"https://app.example.com\"]"
        )
        .unwrap();

        let config = ServerConfig::from_file(file.path()).unwrap();
        assert_eq!(config.league_id, "999");
        assert_eq!(config.rate_limit_ms, 250);
        assert_eq!(config.allowed_origins, vec!["https://app.example.com"]);
        // Untouched fields keep their defaults.
        assert_eq!(config.api_base_url, "https://api.sleeper.app/v1");
    }

    #[test]
    fn from_env_overrides() {
        std::env::set_var("HUDDLE_LEAGUE_ID", "424242");
        std::env::set_var("HUDDLE_RATE_LIMIT_MS", "300");

        let config = ServerConfig::from_env();
        assert_eq!(config.league_id, "424242");
        assert_eq!(config.rate_limit_ms, 300);

        std::env::remove_var("HUDDLE_LEAGUE_ID");
        std::env::remove_var("HUDDLE_RATE_LIMIT_MS");
    }

    #[test]
    fn invalid_addr_fails_validation() {
        let config = ServerConfig {
            http_addr: "not an addr".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
