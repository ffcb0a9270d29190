//! Structured logging for the groundwater data service.
//!
//! Provides context-rich logging with dataset identifiers, timestamps,
//! and severity levels. Supports both console output and file-based
//! logging for daemon operations. Per-file load failures are classified
//! so that operators can tell an unrelated CSV in the data directory
//! from a genuinely broken export.

use chrono::Utc;
use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::sync::Mutex;

use crate::model::LoadError;

// ---------------------------------------------------------------------------
// Log Levels
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl LogLevel {
    /// Parse a configuration string into a level. Case-insensitive.
    pub fn parse(s: &str) -> Option<LogLevel> {
        match s.to_ascii_lowercase().as_str() {
            "debug" => Some(LogLevel::Debug),
            "info" => Some(LogLevel::Info),
            "warn" | "warning" => Some(LogLevel::Warning),
            "error" => Some(LogLevel::Error),
            _ => None,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Debug => write!(f, "DEBUG"),
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Warning => write!(f, "WARN"),
            LogLevel::Error => write!(f, "ERROR"),
        }
    }
}

// ---------------------------------------------------------------------------
// Log Sources
// ---------------------------------------------------------------------------

/// Which part of the service a log entry originates from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogSource {
    Loader,
    Server,
    Config,
    System,
}

impl fmt::Display for LogSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogSource::Loader => write!(f, "LOAD"),
            LogSource::Server => write!(f, "HTTP"),
            LogSource::Config => write!(f, "CFG"),
            LogSource::System => write!(f, "SYS"),
        }
    }
}

// ---------------------------------------------------------------------------
// Failure Classification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureType {
    /// Expected failure - the directory may contain CSVs that are not
    /// time-series exports at all (missing the required columns)
    Expected,
    /// Unexpected failure - indicates a broken export or an I/O problem
    Unexpected,
    /// Unknown - cannot determine if this is expected or not
    Unknown,
}

impl fmt::Display for FailureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureType::Expected => write!(f, "EXPECTED"),
            FailureType::Unexpected => write!(f, "UNEXPECTED"),
            FailureType::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

/// Classify a per-file load failure.
pub fn classify_load_failure(err: &LoadError) -> FailureType {
    match err {
        // Unrelated CSVs without the required columns routinely share the
        // data directory with real exports.
        LoadError::MissingColumn(_) => FailureType::Expected,
        // I/O failures on a local directory suggest permissions or disk
        // problems.
        LoadError::Read(_) => FailureType::Unexpected,
        // A structurally broken table could be a truncated download or an
        // exporter quirk.
        LoadError::Malformed(_) => FailureType::Unknown,
    }
}

// ---------------------------------------------------------------------------
// Logger Configuration
// ---------------------------------------------------------------------------

/// Global logger instance
static LOGGER: Mutex<Option<Logger>> = Mutex::new(None);

pub struct Logger {
    /// Minimum log level to display
    min_level: LogLevel,
    /// Optional file path for logging
    log_file: Option<String>,
}

impl Logger {
    /// Initialize the global logger
    pub fn init(min_level: LogLevel, log_file: Option<String>) {
        let logger = Logger {
            min_level,
            log_file,
        };

        *LOGGER.lock().unwrap() = Some(logger);
    }

    fn log(&self, level: LogLevel, source: LogSource, dataset: Option<&str>, message: &str) {
        if level < self.min_level {
            return;
        }

        let timestamp = Utc::now().format("%Y-%m-%d %H:%M:%S UTC");
        let dataset_part = dataset.map(|d| format!(" [{}]", d)).unwrap_or_default();
        let log_entry = format!(
            "{} {} {}{}: {}",
            timestamp, level, source, dataset_part, message
        );

        match level {
            LogLevel::Error | LogLevel::Warning => eprintln!("{}", log_entry),
            LogLevel::Info | LogLevel::Debug => println!("{}", log_entry),
        }

        if let Some(ref path) = self.log_file {
            if let Err(e) = Self::append_to_file(path, &log_entry) {
                eprintln!("Failed to write to log file {}: {}", path, e);
            }
        }
    }

    fn append_to_file(path: &str, entry: &str) -> std::io::Result<()> {
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        writeln!(file, "{}", entry)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Public Logging Functions
// ---------------------------------------------------------------------------

/// Initialize the global logger
pub fn init_logger(min_level: LogLevel, log_file: Option<&str>) {
    Logger::init(min_level, log_file.map(String::from));
}

/// Log a general informational message
pub fn info(source: LogSource, dataset: Option<&str>, message: &str) {
    if let Some(logger) = LOGGER.lock().unwrap().as_ref() {
        logger.log(LogLevel::Info, source, dataset, message);
    }
}

/// Log a warning message
pub fn warn(source: LogSource, dataset: Option<&str>, message: &str) {
    if let Some(logger) = LOGGER.lock().unwrap().as_ref() {
        logger.log(LogLevel::Warning, source, dataset, message);
    }
}

/// Log an error message
pub fn error(source: LogSource, dataset: Option<&str>, message: &str) {
    if let Some(logger) = LOGGER.lock().unwrap().as_ref() {
        logger.log(LogLevel::Error, source, dataset, message);
    }
}

/// Log a debug message
pub fn debug(source: LogSource, dataset: Option<&str>, message: &str) {
    if let Some(logger) = LOGGER.lock().unwrap().as_ref() {
        logger.log(LogLevel::Debug, source, dataset, message);
    }
}

// ---------------------------------------------------------------------------
// Structured Failure Logging
// ---------------------------------------------------------------------------

/// Log a skipped file with automatic classification.
///
/// Expected failures are routed to debug, unexpected ones to error, and
/// unclassifiable ones to warn, so a data directory full of unrelated
/// CSVs does not drown the log in false alarms.
pub fn log_load_failure(file_name: &str, err: &LoadError) {
    let failure_type = classify_load_failure(err);
    let message = format!("skipped [{}]: {}", failure_type, err);

    match failure_type {
        FailureType::Expected => debug(LogSource::Loader, Some(file_name), &message),
        FailureType::Unexpected => error(LogSource::Loader, Some(file_name), &message),
        FailureType::Unknown => warn(LogSource::Loader, Some(file_name), &message),
    }
}

// ---------------------------------------------------------------------------
// Load Summary Logging
// ---------------------------------------------------------------------------

/// Log a summary of the startup load pass
pub fn log_load_summary(total: usize, loaded: usize, failed: usize) {
    let message = format!(
        "Load complete: {}/{} files loaded, {} skipped",
        loaded, total, failed
    );

    if failed == 0 {
        info(LogSource::Loader, None, &message);
    } else if loaded == 0 {
        error(LogSource::Loader, None, &message);
    } else {
        warn(LogSource::Loader, None, &message);
    }
}
