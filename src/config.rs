use std::time::Duration;

use crate::error::{AppError, Result};

pub const PREDICTIONS_API_URL: &str = "https://predictions-backend-3e9a.onrender.com";
pub const SPORTSDB_URL: &str = "https://www.thesportsdb.com/api/v1/json/3";
pub const FIXTURES_API_URL: &str = "https://api-football-v1.p.rapidapi.com";
pub const FIXTURES_API_HOST: &str = "api-football-v1.p.rapidapi.com";

/// League used to populate the team predictor dropdowns.
pub const TEAMS_LEAGUE: &str = "English Premier League";

/// The team directory is truncated to this many entries after sorting.
pub const MAX_TEAMS: usize = 50;

/// Interval for the prediction feeds (seconds). No jitter, no backoff.
pub const POLL_INTERVAL_SECS: u64 = 30;

/// Client-side timeout for plain reads (seconds).
pub const READ_TIMEOUT_SECS: u64 = 10;

/// Client-side timeout for predict and sport-scoped reads (seconds).
pub const SPORT_TIMEOUT_SECS: u64 = 15;

/// Local hours of day at which the fixture cache is re-checked.
pub const FIXTURE_REFRESH_HOURS: &[u32] = &[6, 10, 16, 20];

/// Key/value cache keys for the fixture cache.
pub mod cache_keys {
    pub const FIXTURES_DATA: &str = "fixtures:data";
    pub const FIXTURES_UPDATED_AT: &str = "fixtures:updatedAt";
}

/// Delay between simulated upcoming-match notifications (milliseconds).
pub const DEMO_NOTIFICATION_STAGGER_MS: u64 = 2_000;

#[derive(Debug, Clone)]
pub struct Config {
    pub predictions_api_url: String,
    pub sportsdb_url: String,
    pub fixtures_api_url: String,
    /// RapidAPI key sent as `X-RapidAPI-Key` (FIXTURES_API_KEY)
    pub fixtures_api_key: String,
    pub fixtures_league: u32,
    pub fixtures_season: u32,
    pub teams_league: String,
    pub log_level: String,
    pub db_path: String,
    pub api_port: u16,
    pub poll_interval_secs: u64,
    pub read_timeout: Duration,
    /// Timeout for predict and sport-scoped reads
    pub sport_timeout: Duration,
    /// Push three upcoming-match notices at startup (DEMO_NOTIFICATIONS)
    pub demo_notifications: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            predictions_api_url: std::env::var("PREDICTIONS_API_URL")
                .unwrap_or_else(|_| PREDICTIONS_API_URL.to_string()),
            sportsdb_url: std::env::var("SPORTSDB_URL")
                .unwrap_or_else(|_| SPORTSDB_URL.to_string()),
            fixtures_api_url: std::env::var("FIXTURES_API_URL")
                .unwrap_or_else(|_| FIXTURES_API_URL.to_string()),
            fixtures_api_key: std::env::var("FIXTURES_API_KEY").unwrap_or_default(),
            fixtures_league: std::env::var("FIXTURES_LEAGUE")
                .unwrap_or_else(|_| "39".to_string())
                .parse::<u32>()
                .unwrap_or(39),
            fixtures_season: std::env::var("FIXTURES_SEASON")
                .unwrap_or_else(|_| "2023".to_string())
                .parse::<u32>()
                .unwrap_or(2023),
            teams_league: std::env::var("TEAMS_LEAGUE")
                .unwrap_or_else(|_| TEAMS_LEAGUE.to_string()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            db_path: std::env::var("DB_PATH").unwrap_or_else(|_| "hub.db".to_string()),
            api_port: std::env::var("API_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse::<u16>()
                .map_err(|_| AppError::Config("API_PORT must be a valid port number".to_string()))?,
            poll_interval_secs: std::env::var("POLL_INTERVAL_SECS")
                .unwrap_or_else(|_| POLL_INTERVAL_SECS.to_string())
                .parse::<u64>()
                .unwrap_or(POLL_INTERVAL_SECS),
            read_timeout: Duration::from_secs(
                std::env::var("READ_TIMEOUT_SECS")
                    .unwrap_or_else(|_| READ_TIMEOUT_SECS.to_string())
                    .parse::<u64>()
                    .unwrap_or(READ_TIMEOUT_SECS),
            ),
            sport_timeout: Duration::from_secs(
                std::env::var("SPORT_TIMEOUT_SECS")
                    .unwrap_or_else(|_| SPORT_TIMEOUT_SECS.to_string())
                    .parse::<u64>()
                    .unwrap_or(SPORT_TIMEOUT_SECS),
            ),
            demo_notifications: std::env::var("DEMO_NOTIFICATIONS")
                .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),
        })
    }

    /// Defaults for every field with all upstreams pointed at `base_url`.
    /// Used by tests that stand up a local stub server.
    #[cfg(test)]
    pub fn for_base_url(base_url: &str) -> Self {
        Self {
            predictions_api_url: base_url.to_string(),
            sportsdb_url: base_url.to_string(),
            fixtures_api_url: base_url.to_string(),
            fixtures_api_key: "test-key".to_string(),
            fixtures_league: 39,
            fixtures_season: 2023,
            teams_league: TEAMS_LEAGUE.to_string(),
            log_level: "debug".to_string(),
            db_path: ":memory:".to_string(),
            api_port: 0,
            poll_interval_secs: POLL_INTERVAL_SECS,
            read_timeout: Duration::from_secs(READ_TIMEOUT_SECS),
            sport_timeout: Duration::from_secs(SPORT_TIMEOUT_SECS),
            demo_notifications: false,
        }
    }
}
