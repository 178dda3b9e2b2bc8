//! Configuration system for chronicle.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{ChronicleError, ChronicleResult};
use crate::surface::DEFAULT_PAGE_SIZE;

/// Main server and store configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChronicleConfig {
    /// Address to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
    /// Path to the changelog database.
    pub database_path: PathBuf,
    /// Entries per listing page.
    pub page_size: u32,
    /// Bearer token for the admin routes. Admin routes are open when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_token: Option<String>,
    /// Insert the sample releases on startup.
    pub seed_on_start: bool,
}

impl Default for ChronicleConfig {
    fn default() -> Self {
        let chronicle_dir = dirs::home_dir()
            .map(|h| h.join(".chronicle"))
            .unwrap_or_else(|| PathBuf::from(".chronicle"));

        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            database_path: chronicle_dir.join("changelog.db"),
            page_size: DEFAULT_PAGE_SIZE,
            admin_token: None,
            seed_on_start: false,
        }
    }
}

impl ChronicleConfig {
    /// Load configuration from a file (TOML, JSON, or YAML).
    pub fn from_file(path: impl AsRef<std::path::Path>) -> ChronicleResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let ext = path.as_ref().extension().and_then(|e| e.to_str());

        let config: Self = match ext {
            Some("toml") => {
                toml::from_str(&content).map_err(|e| ChronicleError::Configuration(e.to_string()))?
            }
            Some("json") => serde_json::from_str(&content)
                .map_err(|e| ChronicleError::Configuration(e.to_string()))?,
            Some("yaml" | "yml") => serde_yaml::from_str(&content)
                .map_err(|e| ChronicleError::Configuration(e.to_string()))?,
            _ => {
                return Err(ChronicleError::Configuration(
                    "Unsupported config file format. Use .toml, .json, or .yaml".to_string(),
                ))
            }
        };
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from environment variables.
    ///
    /// Reads:
    /// - `CHRONICLE_HOST` (default: 0.0.0.0)
    /// - `CHRONICLE_PORT` (default: 8080)
    /// - `CHRONICLE_DB_PATH` (default: ~/.chronicle/changelog.db)
    /// - `CHRONICLE_PAGE_SIZE` (default: 25)
    /// - `CHRONICLE_ADMIN_TOKEN` (default: none)
    /// - `CHRONICLE_SEED` (`true`/`1`/`yes`/`on` seeds sample releases on start)
    pub fn from_env() -> ChronicleResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ChronicleResult<Self> {
        let mut config = Self::default();

        if let Some(host) = lookup("CHRONICLE_HOST") {
            config.host = host;
        }
        if let Some(port) = lookup("CHRONICLE_PORT") {
            config.port = port.parse().map_err(|_| {
                ChronicleError::Configuration(format!("CHRONICLE_PORT is not a valid port: {}", port))
            })?;
        }
        if let Some(path) = lookup("CHRONICLE_DB_PATH") {
            config.database_path = PathBuf::from(path);
        }
        if let Some(size) = lookup("CHRONICLE_PAGE_SIZE") {
            config.page_size = size.parse().map_err(|_| {
                ChronicleError::Configuration(format!(
                    "CHRONICLE_PAGE_SIZE is not a valid number: {}",
                    size
                ))
            })?;
        }
        if let Some(token) = lookup("CHRONICLE_ADMIN_TOKEN").filter(|t| !t.is_empty()) {
            config.admin_token = Some(token);
        }
        if let Some(seed) = lookup("CHRONICLE_SEED") {
            config.seed_on_start = parse_flag(&seed).ok_or_else(|| {
                ChronicleError::Configuration(format!(
                    "CHRONICLE_SEED is not a valid boolean: {}",
                    seed
                ))
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> ChronicleResult<()> {
        if self.page_size == 0 {
            return Err(ChronicleError::Configuration(
                "page_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// `host:port` for binding.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "" | "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
