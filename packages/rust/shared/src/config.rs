//! Application configuration for Wikiracer.
//!
//! User config lives at `~/.wikiracer/wikiracer.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Result, WikiracerError};
use crate::types::RaceSettings;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "wikiracer.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".wikiracer";

// ---------------------------------------------------------------------------
// Config structs (matching wikiracer.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// MediaWiki API settings.
    #[serde(default)]
    pub api: ApiConfig,

    /// Race defaults.
    #[serde(default)]
    pub race: RaceConfig,
}

/// `[api]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// MediaWiki Action API endpoint.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Maximum number of candidates requested per search.
    #[serde(default = "default_search_limit")]
    pub search_limit: u32,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Minimum ms to wait before each API request.
    #[serde(default)]
    pub rate_limit_ms: u64,

    /// Override for the User-Agent header.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            search_limit: default_search_limit(),
            timeout_secs: default_timeout_secs(),
            rate_limit_ms: 0,
            user_agent: None,
        }
    }
}

fn default_endpoint() -> String {
    "https://en.wikipedia.org/w/api.php".into()
}
fn default_search_limit() -> u32 {
    10
}
fn default_timeout_secs() -> u64 {
    30
}

/// `[race]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RaceConfig {
    /// Stop expanding paths after this many hops. Unbounded when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<u32>,

    /// Resolve ambiguous terms to the first search result instead of asking.
    #[serde(default)]
    pub first_candidate: bool,
}

// ---------------------------------------------------------------------------
// Runtime configs (merged from config + CLI flags)
// ---------------------------------------------------------------------------

/// Runtime HTTP client configuration for the MediaWiki provider.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Parsed API endpoint.
    pub endpoint: Url,
    /// Maximum candidates per search.
    pub search_limit: u32,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Delay before each request in ms.
    pub rate_limit_ms: u64,
    /// User-Agent override.
    pub user_agent: Option<String>,
}

impl TryFrom<&ApiConfig> for ClientConfig {
    type Error = WikiracerError;

    fn try_from(api: &ApiConfig) -> Result<Self> {
        let endpoint = Url::parse(&api.endpoint).map_err(|e| {
            WikiracerError::config(format!("invalid API endpoint '{}': {e}", api.endpoint))
        })?;

        if endpoint.scheme() != "http" && endpoint.scheme() != "https" {
            return Err(WikiracerError::config(format!(
                "API endpoint must be http or https, got '{}'",
                endpoint.scheme()
            )));
        }

        if api.search_limit == 0 {
            return Err(WikiracerError::config("search_limit must be at least 1"));
        }

        Ok(Self {
            endpoint,
            search_limit: api.search_limit,
            timeout_secs: api.timeout_secs,
            rate_limit_ms: api.rate_limit_ms,
            user_agent: api.user_agent.clone(),
        })
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.wikiracer/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| WikiracerError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.wikiracer/wikiracer.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| WikiracerError::io(path, e))?;

    toml::from_str(&content).map_err(|e| {
        WikiracerError::config(format!("failed to parse {}: {e}", path.display()))
    })
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| WikiracerError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| WikiracerError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| WikiracerError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

/// Read a JSON race settings file (`{"start": ..., "end": ...}`).
pub fn load_settings(path: &Path) -> Result<RaceSettings> {
    let content = std::fs::read_to_string(path).map_err(|e| WikiracerError::io(path, e))?;

    let settings: RaceSettings = serde_json::from_str(&content).map_err(|e| {
        WikiracerError::config(format!("failed to parse settings {}: {e}", path.display()))
    })?;

    tracing::debug!(?path, start = %settings.start, end = %settings.end, "loaded race settings");
    Ok(settings)
}
