//! Runtime configuration.
//!
//! Values come from an optional JSON file in the platform data directory,
//! then from environment variables, then from built-in defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::remote::is_http_url;

const CONFIG_FILE: &str = "city-explorer.json";
const DB_FILE: &str = "cities.db";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

pub const DEFAULT_SOURCE_URL: &str = "https://gist.githubusercontent.com/hernan-uala/dce8843a8edbe0b0018b32e137bc2b3a/raw/0996accf70cb0ca0e16f9a99e0ee185fafca7af1/cities.json";

pub const SOURCE_URL_ENV: &str = "CITY_EXPLORER_SOURCE_URL";
pub const DB_PATH_ENV: &str = "CITY_EXPLORER_DB_PATH";

/// Values as written in the config file; every field is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    pub source_url: Option<String>,
    #[serde(default)]
    pub db_path: Option<PathBuf>,
    #[serde(default)]
    pub http_timeout_secs: Option<u64>,
}

/// Resolved application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub source_url: String,
    pub db_path: PathBuf,
    pub http_timeout: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            source_url: DEFAULT_SOURCE_URL.to_string(),
            db_path: data_dir().join(DB_FILE),
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        }
    }
}

impl AppConfig {
    /// Load from the default config file and the process environment.
    pub fn load() -> Self {
        let file = load_config_file(&default_config_path());
        Self::resolve(
            file,
            std::env::var(SOURCE_URL_ENV).ok(),
            std::env::var(DB_PATH_ENV).ok(),
        )
    }

    /// Merge file values, environment values, and defaults.
    ///
    /// File values win over environment values. A source URL without an
    /// http(s) scheme is ignored with a warning.
    pub fn resolve(
        file: ConfigFile,
        env_source_url: Option<String>,
        env_db_path: Option<String>,
    ) -> Self {
        let defaults = Self::default();

        let source_url = non_blank(file.source_url)
            .or_else(|| non_blank(env_source_url))
            .and_then(|url| {
                if is_http_url(&url) {
                    Some(url)
                } else {
                    tracing::warn!("Ignoring source URL without http(s) scheme: {url}");
                    None
                }
            })
            .unwrap_or(defaults.source_url);

        let db_path = file
            .db_path
            .filter(|path| !path.as_os_str().is_empty())
            .or_else(|| non_blank(env_db_path).map(PathBuf::from))
            .unwrap_or(defaults.db_path);

        let http_timeout = file
            .http_timeout_secs
            .filter(|secs| *secs > 0)
            .map_or(defaults.http_timeout, Duration::from_secs);

        Self {
            source_url,
            db_path,
            http_timeout,
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Platform data directory for City Explorer.
pub fn data_dir() -> PathBuf {
    dirs::data_local_dir()
        .or_else(dirs::data_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join("city-explorer")
}

pub fn default_config_path() -> PathBuf {
    data_dir().join(CONFIG_FILE)
}

/// Read a config file, falling back to defaults when missing or malformed.
pub fn load_config_file(path: &Path) -> ConfigFile {
    if !path.exists() {
        return ConfigFile::default();
    }

    match std::fs::read_to_string(path) {
        Ok(content) => match serde_json::from_str::<ConfigFile>(&content) {
            Ok(config) => config,
            Err(error) => {
                tracing::warn!("Failed to parse config at {}: {}", path.display(), error);
                ConfigFile::default()
            }
        },
        Err(error) => {
            tracing::warn!("Failed to read config at {}: {}", path.display(), error);
            ConfigFile::default()
        }
    }
}
