//! Service configuration.
//!
//! Loaded from a TOML file whose path comes from the first CLI argument
//! (default `gwdata.toml`). A missing file is not an error — defaults
//! let a checkout with a `./data` directory run with no setup. A `.env`
//! file is honored via dotenv; `GWDATA_DATA_DIR` and `GWDATA_PORT`
//! override the file for containerized deployments.

use std::path::PathBuf;

use serde::Deserialize;

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory scanned for CSV exports at startup.
    pub data_dir: PathBuf,
    /// Listen address.
    pub host: String,
    /// Listen port.
    pub port: u16,
    /// Minimum log level: debug, info, warn, error.
    pub log_level: String,
    /// Optional log file, appended to alongside console output.
    pub log_file: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            host: "0.0.0.0".to_string(),
            port: 8000,
            log_level: "info".to_string(),
            log_file: None,
        }
    }
}

impl Config {
    /// Load from `path`, falling back to defaults when the file is
    /// absent, then apply environment overrides.
    pub fn load(path: &str) -> Result<Config, ConfigError> {
        let mut config = if std::path::Path::new(path).exists() {
            let text = std::fs::read_to_string(path)
                .map_err(|e| ConfigError::Read(format!("{}: {}", path, e)))?;
            toml::from_str(&text).map_err(|e| ConfigError::Parse(format!("{}: {}", path, e)))?
        } else {
            Config::default()
        };
        config.apply_env();
        Ok(config)
    }

    fn apply_env(&mut self) {
        if let Ok(dir) = std::env::var("GWDATA_DATA_DIR") {
            self.data_dir = PathBuf::from(dir);
        }
        if let Ok(port) = std::env::var("GWDATA_PORT") {
            if let Ok(port) = port.parse() {
                self.port = port;
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors that can arise when loading the configuration file.
#[derive(Debug, PartialEq)]
pub enum ConfigError {
    /// The file exists but could not be read.
    Read(String),
    /// The file is not valid TOML or has the wrong shape.
    Parse(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Read(msg) => write!(f, "config read error: {}", msg),
            ConfigError::Parse(msg) => write!(f, "config parse error: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
