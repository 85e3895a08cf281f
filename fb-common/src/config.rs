//! Configuration loading
//!
//! Settings are resolved in priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! Tiers 1 and 2 are handled by each binary's clap `Args` (flags with `env`),
//! which hand the result to [`ServiceConfig::resolve`] as [`CliOverrides`].

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

/// Default HTTP bind address for fb-rv
pub const DEFAULT_BIND: &str = "127.0.0.1:4000";

/// Default OpenAI-compatible API base URL
pub const DEFAULT_ANALYSIS_BASE_URL: &str = "https://api.openai.com/v1";

/// Bootstrap configuration loaded from TOML file
///
/// Every field is optional; a missing file is equivalent to an empty one.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    /// HTTP bind address (host:port)
    #[serde(default)]
    pub bind: Option<String>,

    /// Path to the SQLite database file
    #[serde(default)]
    pub database_path: Option<PathBuf>,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Review analysis configuration
    #[serde(default)]
    pub analysis: AnalysisSettings,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level or filter directive (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Review analysis configuration
///
/// The presence of a usable `api_key` selects the external text-generation
/// service; without one the deterministic rule analyzer is used.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisSettings {
    /// Credential for the text-generation service
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl AnalysisSettings {
    /// Credential if one is configured and non-blank
    pub fn credential(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|key| is_valid_key(key))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_base_url() -> String {
    DEFAULT_ANALYSIS_BASE_URL.to_string()
}

fn default_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_tokens() -> u32 {
    200
}

fn default_timeout_ms() -> u64 {
    30_000
}

/// Validate API key (non-empty, non-whitespace)
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}

impl TomlConfig {
    /// Load and parse a TOML config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
        Self::parse(&content)
            .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))
    }

    /// Parse TOML text
    pub fn parse(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load the explicitly requested file, or the default file if it exists
    ///
    /// An explicit path must exist. A missing default file yields an empty
    /// config; an unreadable or malformed file is always an error.
    pub fn load_or_default(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            info!("Loading config: {}", path.display());
            return Self::load(path);
        }

        match default_config_path() {
            Some(path) if path.exists() => {
                info!("Loading config: {}", path.display());
                Self::load(&path)
            }
            Some(path) => {
                info!("No config file at {} (using defaults)", path.display());
                Ok(Self::default())
            }
            None => {
                warn!("Could not determine config directory (using defaults)");
                Ok(Self::default())
            }
        }
    }
}

/// Default configuration file path for the platform
///
/// `~/.config/feedback/config.toml` on Linux, the platform config directory
/// elsewhere.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("feedback").join("config.toml"))
}

/// Default database path for the platform
pub fn default_database_path() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("feedback"))
        .unwrap_or_else(|| PathBuf::from("./feedback_data"))
        .join("reviews.db")
}

/// Values supplied on the command line or through the environment
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub bind: Option<String>,
    pub database_path: Option<PathBuf>,
    pub api_key: Option<String>,
}

/// Fully resolved configuration for fb-rv
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub bind: String,
    pub database_path: PathBuf,
    pub logging: LoggingConfig,
    pub analysis: AnalysisSettings,
}

impl ServiceConfig {
    /// Merge command-line/env overrides over the TOML file over defaults
    pub fn resolve(toml: TomlConfig, overrides: CliOverrides) -> Self {
        let mut analysis = toml.analysis;
        if let Some(key) = overrides.api_key.filter(|k| is_valid_key(k)) {
            analysis.api_key = Some(key);
        }

        Self {
            bind: overrides
                .bind
                .or(toml.bind)
                .unwrap_or_else(|| DEFAULT_BIND.to_string()),
            database_path: overrides
                .database_path
                .or(toml.database_path)
                .unwrap_or_else(default_database_path),
            logging: toml.logging,
            analysis,
        }
    }
}
