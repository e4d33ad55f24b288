// Configuration structs

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::constants::*;

/// Backoff policy for idempotent API requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Total attempts, including the first one
    #[serde(default = "default_retry_attempts")]
    pub max_attempts: u32,
    /// Delay before the second attempt; doubles after each failure
    #[serde(default = "default_retry_base_delay_ms")]
    pub base_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_RETRY_ATTEMPTS,
            base_delay_ms: DEFAULT_RETRY_BASE_DELAY_MS,
        }
    }
}

fn default_retry_attempts() -> u32 {
    DEFAULT_RETRY_ATTEMPTS
}

fn default_retry_base_delay_ms() -> u64 {
    DEFAULT_RETRY_BASE_DELAY_MS
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Base URL of the control-plane API
    pub api_url: String,

    /// SQLite database holding device, session and catalog
    pub db_path: PathBuf,

    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,

    pub retry: RetryConfig,

    /// Default size of the recent locations list
    pub recent_locations_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            db_path: default_data_dir().join(DB_FILE_NAME),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            retry: RetryConfig::default(),
            recent_locations_limit: DEFAULT_RECENT_LOCATIONS_LIMIT,
        }
    }
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        let url = self.api_url.trim();
        if url.is_empty() {
            anyhow::bail!("api_url must not be empty");
        }
        if !(url.starts_with("https://") || url.starts_with("http://")) {
            anyhow::bail!(
                "api_url '{}' must start with http:// or https://\n\n\
                 Update your config:\n  Edit ~/{}/{}",
                self.api_url,
                DATA_DIR_NAME,
                CONFIG_FILE_NAME
            );
        }
        if self.request_timeout_secs == 0 {
            anyhow::bail!("request_timeout_secs must be greater than 0");
        }
        if self.retry.max_attempts == 0 {
            anyhow::bail!("retry.max_attempts must be at least 1");
        }
        Ok(())
    }
}

/// `~/.upvpn`, or `./.upvpn` when the home directory is unknown.
pub fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DATA_DIR_NAME)
}
