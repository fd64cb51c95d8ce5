/// Structured logging for the earthquake service
///
/// Provides context-rich logging with a data source tag, an optional query
/// context (the date window being fetched), timestamps, and severity levels.
/// Supports console output and an optional append-only log file.

use chrono::Utc;
use serde::Deserialize;
use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::str::FromStr;
use std::sync::{Mutex, MutexGuard};

use crate::model::{EarthquakeCollection, QuakeError};

// ---------------------------------------------------------------------------
// Log Levels
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Deserialize)]
#[serde(try_from = "String")]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
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

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, String> {
        match s.trim().to_ascii_lowercase().as_str() {
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warning),
            "error" => Ok(LogLevel::Error),
            other => Err(format!("unknown log level '{}'", other)),
        }
    }
}

impl TryFrom<String> for LogLevel {
    type Error = String;

    fn try_from(value: String) -> Result<Self, String> {
        value.parse()
    }
}

// ---------------------------------------------------------------------------
// Data Source Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    /// Real-time summary feed.
    Feed,
    /// FDSN date-range query.
    Query,
    System,
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Feed => write!(f, "FEED"),
            DataSource::Query => write!(f, "QUERY"),
            DataSource::System => write!(f, "SYS"),
        }
    }
}

// ---------------------------------------------------------------------------
// Failure Classification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureType {
    /// Expected failure - the caller supplied bad input
    Expected,
    /// Unexpected failure - transport problems or a payload we cannot read
    Unexpected,
    /// Unknown - the server rejected the query; may be input or service side
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
    /// Whether to include timestamps in console output
    console_timestamps: bool,
}

impl Logger {
    /// Initialize the global logger
    pub fn init(min_level: LogLevel, log_file: Option<String>, console_timestamps: bool) {
        let logger = Logger {
            min_level,
            log_file,
            console_timestamps,
        };

        *lock_logger() = Some(logger);
    }

    fn log(&self, level: LogLevel, source: DataSource, context: Option<&str>, message: &str) {
        if level < self.min_level {
            return;
        }

        let timestamp = Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string();
        let log_entry = format_entry(&timestamp, level, source, context, message);
        let context_part = context.map(|c| format!(" [{}]", c)).unwrap_or_default();

        // Console output
        if self.console_timestamps {
            match level {
                LogLevel::Error => eprintln!("{}", log_entry),
                LogLevel::Warning => eprintln!("   {}", log_entry),
                LogLevel::Info => println!("   {}", message),
                LogLevel::Debug => println!("   [DEBUG] {}", message),
            }
        } else {
            match level {
                LogLevel::Error => eprintln!("   ✗ {}{}: {}", source, context_part, message),
                LogLevel::Warning => eprintln!("   ⚠ {}{}: {}", source, context_part, message),
                LogLevel::Info => println!("   {}", message),
                LogLevel::Debug => {} // Skip debug in non-timestamp mode
            }
        }

        // File output
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

/// One log line as written to the log file.
pub fn format_entry(
    timestamp: &str,
    level: LogLevel,
    source: DataSource,
    context: Option<&str>,
    message: &str,
) -> String {
    let context_part = context.map(|c| format!(" [{}]", c)).unwrap_or_default();
    format!("{} {} {}{}: {}", timestamp, level, source, context_part, message)
}

// ---------------------------------------------------------------------------
// Public Logging Functions
// ---------------------------------------------------------------------------

/// Initialize the global logger
pub fn init_logger(min_level: LogLevel, log_file: Option<&str>, console_timestamps: bool) {
    Logger::init(min_level, log_file.map(String::from), console_timestamps);
}

fn lock_logger() -> MutexGuard<'static, Option<Logger>> {
    LOGGER.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn dispatch(level: LogLevel, source: DataSource, context: Option<&str>, message: &str) {
    if let Some(logger) = lock_logger().as_ref() {
        logger.log(level, source, context, message);
    }
}

/// Log a general informational message
pub fn info(source: DataSource, context: Option<&str>, message: &str) {
    dispatch(LogLevel::Info, source, context, message);
}

/// Log a warning message
pub fn warn(source: DataSource, context: Option<&str>, message: &str) {
    dispatch(LogLevel::Warning, source, context, message);
}

/// Log an error message
pub fn error(source: DataSource, context: Option<&str>, message: &str) {
    dispatch(LogLevel::Error, source, context, message);
}

/// Log a debug message
pub fn debug(source: DataSource, context: Option<&str>, message: &str) {
    dispatch(LogLevel::Debug, source, context, message);
}

// ---------------------------------------------------------------------------
// Failure Classification Helpers
// ---------------------------------------------------------------------------

/// Classify a query failure by its error variant
pub fn classify_failure(err: &QuakeError) -> FailureType {
    match err {
        QuakeError::Validation(_) => FailureType::Expected,
        QuakeError::Network { .. } | QuakeError::Parse(_) => FailureType::Unexpected,
        // 4xx is usually a query the service refuses, 5xx is the service itself
        QuakeError::Query { status, .. } if *status >= 500 => FailureType::Unexpected,
        QuakeError::Query { .. } => FailureType::Unknown,
    }
}

// ---------------------------------------------------------------------------
// Structured Failure Logging
// ---------------------------------------------------------------------------

/// Log a failed operation with automatic classification
pub fn log_query_failure(source: DataSource, context: Option<&str>, operation: &str, err: &QuakeError) {
    let failure_type = classify_failure(err);
    let message = format!("{} failed [{}]: {}", operation, failure_type, err);

    match failure_type {
        FailureType::Expected => debug(source, context, &message),
        FailureType::Unexpected => error(source, context, &message),
        FailureType::Unknown => warn(source, context, &message),
    }
}

// ---------------------------------------------------------------------------
// Collection Summary Logging
// ---------------------------------------------------------------------------

/// One-line description of a fetched collection
pub fn collection_summary(collection: &EarthquakeCollection) -> String {
    let mut message = format!(
        "Fetched {} events (reported total: {})",
        collection.features.len(),
        collection
            .total_count
            .map(|c| c.to_string())
            .unwrap_or_else(|| "unknown".to_string())
    );
    if let Some(limit) = collection.requested_limit.filter(|_| collection.truncated) {
        message.push_str(&format!(", truncated to limit {}", limit));
    }
    message
}

/// Log a summary of a fetched collection; truncated results log as warnings
pub fn log_collection_summary(source: DataSource, context: Option<&str>, collection: &EarthquakeCollection) {
    let message = collection_summary(collection);
    if collection.truncated {
        warn(source, context, &message);
    } else {
        info(source, context, &message);
    }
}
