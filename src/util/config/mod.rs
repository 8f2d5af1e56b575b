//! monomorph configuration
//!
//! # Configuration hierarchy
//!
//! ```text
//! Priority (high → low):
//! 1. CLI arguments
//! 2. Environment variables (MONOMORPH_LOG)
//! 3. Project-level (./monomorph.toml, or --config <PATH>)
//! 4. Default values
//! ```
//!
//! # Example
//!
//! ```toml
//! [transform]
//! max_instantiations = 10000
//! verify_output = true
//!
//! [output]
//! pretty = true
//!
//! [diagnostics]
//! colors = true
//! show_source = true
//!
//! [log]
//! level = "info"
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::util::logger::LogLevel;

/// Project-level config file name
pub const CONFIG_FILE: &str = "monomorph.toml";

/// Environment variable overriding the log level
pub const LOG_ENV: &str = "MONOMORPH_LOG";

/// Top-level configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct MonoConfig {
    /// Transform settings
    #[serde(default)]
    pub transform: TransformConfig,
    /// Output settings
    #[serde(default)]
    pub output: OutputConfig,
    /// Diagnostic rendering settings
    #[serde(default)]
    pub diagnostics: DiagnosticsConfig,
    /// Logging settings
    #[serde(default)]
    pub log: LogConfig,
}

/// Transform configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransformConfig {
    /// Upper bound on registered instantiations per compilation unit
    #[serde(default = "default_max_instantiations")]
    pub max_instantiations: usize,
    /// Re-check that no generic construct survives the transform
    #[serde(default = "default_true")]
    pub verify_output: bool,
}

fn default_max_instantiations() -> usize {
    10_000
}

fn default_true() -> bool {
    true
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            max_instantiations: default_max_instantiations(),
            verify_output: true,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OutputConfig {
    /// Pretty-print JSON output
    #[serde(default = "default_true")]
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { pretty: true }
    }
}

/// Diagnostics configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiagnosticsConfig {
    /// Colored output
    #[serde(default = "default_true")]
    pub colors: bool,
    /// Show the offending source line when the source text is available
    #[serde(default = "default_true")]
    pub show_source: bool,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            colors: true,
            show_source: true,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LogConfig {
    /// One of `debug`, `info`, `warn`, `error`
    #[serde(default = "default_level")]
    pub level: String,
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

impl LogConfig {
    /// Effective level: environment first, then the configured value
    pub fn effective_level(&self) -> LogLevel {
        std::env::var(LOG_ENV)
            .ok()
            .and_then(|v| LogLevel::parse(&v))
            .or_else(|| LogLevel::parse(&self.level))
            .unwrap_or(LogLevel::Info)
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Config parse error in {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Parse configuration text
pub fn parse_config(
    text: &str,
    path: &Path,
) -> Result<MonoConfig, ConfigError> {
    toml::from_str(text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Load configuration from an explicit file
pub fn load_config_file(path: &Path) -> Result<MonoConfig, ConfigError> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&text, path)
}

/// Load configuration: explicit path, else `monomorph.toml` in `dir`, else defaults
pub fn load_config(
    explicit: Option<&Path>,
    dir: &Path,
) -> Result<MonoConfig, ConfigError> {
    if let Some(path) = explicit {
        return load_config_file(path);
    }
    let project = dir.join(CONFIG_FILE);
    if project.exists() {
        return load_config_file(&project);
    }
    Ok(MonoConfig::default())
}
