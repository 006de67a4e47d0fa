//! Application configuration.
//!
//! Configuration is loaded from a TOML file at:
//! 1. `--config <FILE>` on the command line
//! 2. `$MAIL2ES_CONFIG` (environment variable)
//! 3. `~/.config/mail2es/config.toml` (Linux/macOS)
//!    `%APPDATA%\mail2es\config.toml` (Windows)
//! 4. Built-in defaults
//!
//! A file that cannot be read or parsed falls back to the defaults; the
//! binary reports why once logging is set up.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::model::document::DateFormat;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Logging and directories.
    pub general: GeneralConfig,
    /// Shape of the emitted document.
    pub output: OutputConfig,
    /// Input limits.
    pub input: InputConfig,
}

/// General behavior settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub log_level: String,
    /// Also write the log to `<cache_dir>/mail2es.log`.
    pub log_to_file: bool,
    /// Override cache directory for logs.
    pub cache_dir: Option<PathBuf>,
}

/// Output settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Indent the JSON document.
    pub pretty: bool,
    /// Rendering of the `date` field.
    pub date_format: DateFormat,
}

/// Input settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Maximum message size in bytes (default: 268435456 = 256 MB).
    pub max_message_size: usize,
}

// ── Default implementations ─────────────────────────────────────

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
            log_to_file: false,
            cache_dir: None,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            pretty: true,
            date_format: DateFormat::default(),
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            max_message_size: 256 * 1024 * 1024, // 256 MB
        }
    }
}

// ── Load ────────────────────────────────────────────────────────

/// Locate the configuration file: an explicit path wins, then the standard
/// locations. `None` when no file exists there.
pub fn locate_config(explicit: Option<&Path>) -> Option<PathBuf> {
    match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => config_file_path().filter(|path| path.exists()),
    }
}

/// Read and parse a configuration file.
pub fn read_config(path: &Path) -> anyhow::Result<Config> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let cfg = toml::from_str::<Config>(&contents)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    Ok(cfg)
}

/// Load configuration from `path`, or the defaults when there is none.
///
/// A file that cannot be used is not fatal: the defaults are returned along
/// with the error, so the caller can report it once logging is up.
pub fn load_config(path: Option<&Path>) -> (Config, Option<anyhow::Error>) {
    match path.map(read_config) {
        Some(Ok(cfg)) => (cfg, None),
        Some(Err(e)) => (Config::default(), Some(e)),
        None => (Config::default(), None),
    }
}

/// Determine the config file path (checking env var first, then standard dirs).
pub fn config_file_path() -> Option<PathBuf> {
    if let Ok(env_path) = std::env::var("MAIL2ES_CONFIG") {
        return Some(PathBuf::from(env_path));
    }
    dirs::config_dir().map(|d| d.join("mail2es").join("config.toml"))
}

/// Return the cache directory for logs.
pub fn cache_dir(config: &Config) -> PathBuf {
    if let Some(ref dir) = config.general.cache_dir {
        return dir.clone();
    }
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("mail2es")
}

/// Return the log file path.
pub fn log_file_path(config: &Config) -> PathBuf {
    cache_dir(config).join("mail2es.log")
}
