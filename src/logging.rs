//! Structured logging
//!
//! This module provides the application's logger:
//! - Leveled entries with structured fields
//! - Console, JSON and compact output formats
//! - Correlation IDs tying together the entries of one request
//! - Specialized request logging for the HTTP handlers
//!
//! Everything is written to stderr so command output on stdout stays clean.

use crate::error::{AppError, Result};
use crate::models::Config;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Log level enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LogLevel {
    /// Trace level - most detailed
    Trace = 0,
    /// Debug level - detailed information for debugging
    Debug = 1,
    /// Info level - general application information
    Info = 2,
    /// Warning level - potentially harmful situations
    Warn = 3,
    /// Error level - error events but application can continue
    Error = 4,
    /// Fatal level - severe error events that cause application termination
    Fatal = 5,
}

impl LogLevel {
    /// Get log level name as string
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "TRACE",
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
            LogLevel::Fatal => "FATAL",
        }
    }

    /// Get ANSI color code for console output
    pub fn color_code(&self) -> &'static str {
        match self {
            LogLevel::Trace => "\x1b[37m",
            LogLevel::Debug => "\x1b[36m",
            LogLevel::Info => "\x1b[32m",
            LogLevel::Warn => "\x1b[33m",
            LogLevel::Error => "\x1b[31m",
            LogLevel::Fatal => "\x1b[35m",
        }
    }

    /// Reset ANSI color code
    pub fn reset_code() -> &'static str {
        "\x1b[0m"
    }
}

impl std::str::FromStr for LogLevel {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_uppercase().as_str() {
            "TRACE" => Ok(LogLevel::Trace),
            "DEBUG" => Ok(LogLevel::Debug),
            "INFO" => Ok(LogLevel::Info),
            "WARN" | "WARNING" => Ok(LogLevel::Warn),
            "ERROR" => Ok(LogLevel::Error),
            "FATAL" => Ok(LogLevel::Fatal),
            _ => Err(AppError::parse(format!("Invalid log level: {}", s))),
        }
    }
}

/// Log entry structure for structured logging
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub message: String,
    /// Logger name/component
    pub logger: String,
    /// Correlation ID for tracking related events
    pub correlation_id: Option<String>,
    /// Additional structured fields
    pub fields: BTreeMap<String, serde_json::Value>,
}

/// Log output format options
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LogFormat {
    /// Human-readable console format
    Console,
    /// JSON format for structured logging
    Json,
    /// Compact single-line format
    Compact,
}

/// Where formatted entries go
#[derive(Clone)]
enum LogSink {
    Stderr,
    Memory(Arc<Mutex<Vec<String>>>),
}

/// Shared logging context
#[derive(Debug, Default)]
struct LogContext {
    /// Fields added to every entry
    context_fields: BTreeMap<String, serde_json::Value>,
}

/// Logger implementation with multiple output formats
#[derive(Clone)]
pub struct Logger {
    min_level: LogLevel,
    use_color: bool,
    format: LogFormat,
    name: String,
    sink: LogSink,
    context: Arc<RwLock<LogContext>>,
}

impl Logger {
    /// Create a new logger
    pub fn new(name: &str) -> Self {
        Self {
            min_level: LogLevel::Info,
            use_color: true,
            format: LogFormat::Console,
            name: name.to_string(),
            sink: LogSink::Stderr,
            context: Arc::new(RwLock::new(LogContext::default())),
        }
    }

    /// Create a logger with specific configuration.
    ///
    /// `quiet_level` is used when neither `--verbose` nor `--debug` is set.
    pub fn with_config(name: &str, config: &Config, quiet_level: LogLevel) -> Self {
        let min_level = if config.debug {
            LogLevel::Debug
        } else if config.verbose {
            LogLevel::Info
        } else {
            quiet_level
        };

        Self {
            min_level,
            use_color: config.enable_color,
            format: if config.debug { LogFormat::Json } else { LogFormat::Console },
            name: name.to_string(),
            sink: LogSink::Stderr,
            context: Arc::new(RwLock::new(LogContext::default())),
        }
    }

    /// Logger that keeps formatted lines in memory; returns the line buffer
    pub fn in_memory(name: &str, level: LogLevel) -> (Self, Arc<Mutex<Vec<String>>>) {
        let lines = Arc::new(Mutex::new(Vec::new()));
        let logger = Self {
            min_level: level,
            use_color: false,
            format: LogFormat::Compact,
            name: name.to_string(),
            sink: LogSink::Memory(lines.clone()),
            context: Arc::new(RwLock::new(LogContext::default())),
        };
        (logger, lines)
    }

    /// Derive a logger for another component sharing sink and context
    pub fn named(&self, name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..self.clone()
        }
    }

    /// Add context field for all subsequent log entries
    pub async fn add_context_field<T: Serialize>(&self, key: &str, value: T) {
        if let Ok(json_value) = serde_json::to_value(value) {
            let mut context = self.context.write().await;
            context.context_fields.insert(key.to_string(), json_value);
        }
    }

    /// Create a log entry builder
    pub fn log(&self, level: LogLevel, message: &str) -> LogEntryBuilder<'_> {
        LogEntryBuilder::new(self, level, message.to_string())
    }

    pub fn debug(&self, message: &str) -> LogEntryBuilder<'_> {
        self.log(LogLevel::Debug, message)
    }

    pub fn info(&self, message: &str) -> LogEntryBuilder<'_> {
        self.log(LogLevel::Info, message)
    }

    pub fn warn(&self, message: &str) -> LogEntryBuilder<'_> {
        self.log(LogLevel::Warn, message)
    }

    pub fn error(&self, message: &str) -> LogEntryBuilder<'_> {
        self.log(LogLevel::Error, message)
    }

    /// Check if a log level would be output
    pub fn would_log(&self, level: LogLevel) -> bool {
        level >= self.min_level
    }

    async fn write_entry(&self, mut entry: LogEntry) {
        if entry.level < self.min_level {
            return;
        }

        let context = self.context.read().await;
        for (key, value) in &context.context_fields {
            entry.fields.entry(key.clone()).or_insert_with(|| value.clone());
        }
        drop(context);

        let output = match self.format {
            LogFormat::Console => self.format_console(&entry),
            LogFormat::Json => self.format_json(&entry),
            LogFormat::Compact => self.format_compact(&entry),
        };

        match &self.sink {
            LogSink::Stderr => {
                let _ = writeln!(io::stderr(), "{}", output);
            }
            LogSink::Memory(lines) => {
                if let Ok(mut lines) = lines.lock() {
                    lines.push(output);
                }
            }
        }
    }

    fn format_console(&self, entry: &LogEntry) -> String {
        let timestamp = entry.timestamp.format("%Y-%m-%d %H:%M:%S%.3f");
        let level_str = entry.level.as_str();

        let formatted_level = if self.use_color {
            format!("{}{:>5}{}", entry.level.color_code(), level_str, LogLevel::reset_code())
        } else {
            format!("{:>5}", level_str)
        };

        let mut output = format!("{} {} [{}] {}", timestamp, formatted_level, entry.logger, entry.message);

        if let Some(correlation_id) = &entry.correlation_id {
            let short = correlation_id.get(..8).unwrap_or(correlation_id);
            output.push_str(&format!(" [{}]", short));
        }

        if !entry.fields.is_empty() {
            let fields_str: Vec<String> = entry.fields.iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect();
            output.push_str(&format!(" {{{}}}", fields_str.join(", ")));
        }

        output
    }

    fn format_json(&self, entry: &LogEntry) -> String {
        match serde_json::to_string(entry) {
            Ok(json) => json,
            Err(_) => format!("{{\"error\": \"Failed to serialize log entry\", \"message\": \"{}\"}}", entry.message),
        }
    }

    fn format_compact(&self, entry: &LogEntry) -> String {
        let timestamp = entry.timestamp.format("%H:%M:%S");
        let mut output = format!(
            "{} {} {}: {}",
            timestamp,
            entry.level.as_str().chars().next().unwrap_or('?'),
            entry.logger,
            entry.message
        );
        for (k, v) in &entry.fields {
            output.push_str(&format!(" {}={}", k, v));
        }
        output
    }
}

/// Builder pattern for creating log entries
pub struct LogEntryBuilder<'a> {
    logger: &'a Logger,
    entry: LogEntry,
}

impl<'a> LogEntryBuilder<'a> {
    fn new(logger: &'a Logger, level: LogLevel, message: String) -> Self {
        Self {
            logger,
            entry: LogEntry {
                timestamp: Utc::now(),
                level,
                message,
                logger: logger.name.clone(),
                correlation_id: None,
                fields: BTreeMap::new(),
            },
        }
    }

    /// Add a correlation ID
    pub fn correlation_id(mut self, id: &str) -> Self {
        self.entry.correlation_id = Some(id.to_string());
        self
    }

    /// Add a structured field
    pub fn field<T: Serialize>(mut self, key: &str, value: T) -> Self {
        if let Ok(json_value) = serde_json::to_value(value) {
            self.entry.fields.insert(key.to_string(), json_value);
        }
        self
    }

    /// Add error information
    pub fn error_info(self, error: &AppError) -> Self {
        self.field("error_category", error.category())
            .field("error_detail", error.to_string())
    }

    /// Finalize and write the log entry
    pub async fn log(self) {
        self.logger.write_entry(self.entry).await;
    }
}

/// Per-request logger for the HTTP handlers.
///
/// Every entry carries the same correlation id and the route name.
pub struct RequestLogger {
    logger: Logger,
    correlation_id: String,
    route: &'static str,
    started: Instant,
}

impl RequestLogger {
    /// Start a request and log its arrival
    pub async fn start(logger: &Logger, route: &'static str) -> Self {
        let request = Self {
            logger: logger.named("HTTP"),
            correlation_id: Uuid::new_v4().to_string(),
            route,
            started: Instant::now(),
        };

        request.logger.debug(&format!("{} received", route))
            .correlation_id(&request.correlation_id)
            .field("route", route)
            .log()
            .await;

        request
    }

    pub fn correlation_id(&self) -> &str {
        &self.correlation_id
    }

    /// Log a rejected submission; only the field names are recorded
    pub async fn rejected(&self, fields: &[&str]) {
        self.logger.info(&format!("{} rejected: invalid fields", self.route))
            .correlation_id(&self.correlation_id)
            .field("route", self.route)
            .field("fields", fields)
            .field("elapsed_ms", self.started.elapsed().as_millis() as u64)
            .log()
            .await;
    }

    /// Log a failure with full detail; caller mistakes are logged as warnings
    pub async fn failed(&self, error: &AppError) {
        let level = if error.is_user_correctable() { LogLevel::Warn } else { LogLevel::Error };
        self.logger.log(level, &format!("{} failed", self.route))
            .correlation_id(&self.correlation_id)
            .field("route", self.route)
            .field("elapsed_ms", self.started.elapsed().as_millis() as u64)
            .error_info(error)
            .log()
            .await;
    }

    /// Log successful completion
    pub async fn completed(&self, status: u16) {
        self.logger.info(&format!("{} completed", self.route))
            .correlation_id(&self.correlation_id)
            .field("route", self.route)
            .field("status", status)
            .field("elapsed_ms", self.started.elapsed().as_millis() as u64)
            .log()
            .await;
    }
}
