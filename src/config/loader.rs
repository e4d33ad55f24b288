// Configuration loader
// Loads settings from ~/.upvpn/config.toml, then applies environment overrides

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use super::constants::*;
use super::settings::{default_data_dir, Config, RetryConfig};

/// Every field is optional; missing ones keep their defaults.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlConfig {
    api_url: Option<String>,
    db_path: Option<PathBuf>,
    request_timeout_secs: Option<u64>,
    retry: Option<RetryConfig>,
    recent_locations_limit: Option<usize>,
}

/// Load configuration from the default config file (if present) and the
/// environment.
pub fn load_config() -> Result<Config> {
    let path = default_data_dir().join(CONFIG_FILE_NAME);
    let mut config = if path.exists() {
        load_file(&path)?
    } else {
        tracing::debug!("No config file at {}, using defaults", path.display());
        Config::default()
    };

    apply_overrides(
        &mut config,
        std::env::var(ENV_API_URL).ok(),
        std::env::var(ENV_DB_PATH).ok(),
    );

    config
        .validate()
        .context("Configuration validation failed")?;
    Ok(config)
}

/// Load configuration from an explicit file. Environment overrides still
/// apply.
pub fn load_config_from(path: &Path) -> Result<Config> {
    let mut config = load_file(path)?;
    apply_overrides(
        &mut config,
        std::env::var(ENV_API_URL).ok(),
        std::env::var(ENV_DB_PATH).ok(),
    );
    config
        .validate()
        .context("Configuration validation failed")?;
    Ok(config)
}

fn load_file(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    parse(&contents).with_context(|| format!("Failed to parse config file {}", path.display()))
}

fn parse(contents: &str) -> Result<Config> {
    let toml_config: TomlConfig = toml::from_str(contents)?;
    let mut config = Config::default();

    if let Some(url) = toml_config.api_url {
        config.api_url = url;
    }
    if let Some(path) = toml_config.db_path {
        config.db_path = path;
    }
    if let Some(secs) = toml_config.request_timeout_secs {
        config.request_timeout_secs = secs;
    }
    if let Some(retry) = toml_config.retry {
        config.retry = retry;
    }
    if let Some(limit) = toml_config.recent_locations_limit {
        config.recent_locations_limit = limit;
    }
    Ok(config)
}

fn apply_overrides(config: &mut Config, api_url: Option<String>, db_path: Option<String>) {
    if let Some(url) = api_url.filter(|u| !u.trim().is_empty()) {
        tracing::debug!("{} overrides api_url", ENV_API_URL);
        config.api_url = url;
    }
    if let Some(path) = db_path.filter(|p| !p.trim().is_empty()) {
        tracing::debug!("{} overrides db_path", ENV_DB_PATH);
        config.db_path = PathBuf::from(path);
    }
}
