// Project-wide constants
//
// Centralised here so URLs, file names and tuning values have one source of
// truth. Import via `use crate::config::constants::*;`.

/// Production control-plane endpoint.
pub const DEFAULT_API_URL: &str = "https://api.upvpn.app";

/// Directory under $HOME holding the database and config file.
pub const DATA_DIR_NAME: &str = ".upvpn";

pub const CONFIG_FILE_NAME: &str = "config.toml";

pub const DB_FILE_NAME: &str = "upvpn.db";

/// Per-request timeout for the API client.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Attempts for idempotent requests (first try included).
pub const DEFAULT_RETRY_ATTEMPTS: u32 = 3;

pub const DEFAULT_RETRY_BASE_DELAY_MS: u64 = 500;

/// How many entries the "recent locations" view shows.
pub const DEFAULT_RECENT_LOCATIONS_LIMIT: usize = 3;

/// Environment variable overriding `api_url`.
pub const ENV_API_URL: &str = "UPVPN_API_URL";

/// Environment variable overriding `db_path`.
pub const ENV_DB_PATH: &str = "UPVPN_DB_PATH";
