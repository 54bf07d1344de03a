use chrono::{DateTime, Utc};
use colored::*;
use log::{Level, Metadata, Record};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

static CONSOLE_LOGGER: Lazy<ConsoleLogger> = Lazy::new(ConsoleLogger::new);

pub fn init() -> Result<(), String> {
    init_with_config(LoggerConfig::default())
}

pub fn init_with_config(config: LoggerConfig) -> Result<(), String> {
    CONSOLE_LOGGER.update_config(config.clone());

    if let Err(e) = log::set_logger(&*CONSOLE_LOGGER) {
        return Err(format!("Failed to set logger: {:?}", e));
    }

    log::set_max_level(config.min_level);
    Ok(())
}

/// Severity of a journal entry, as shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogSeverity {
    Info,
    Success,
    Error,
    Process,
}

impl LogSeverity {
    pub fn color(&self) -> Color {
        match self {
            LogSeverity::Info => Color::Blue,
            LogSeverity::Success => Color::Green,
            LogSeverity::Error => Color::Red,
            LogSeverity::Process => Color::Yellow,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LogSeverity::Info => "INFO",
            LogSeverity::Success => "OK",
            LogSeverity::Error => "ERR",
            LogSeverity::Process => "PROC",
        }
    }

    fn to_log_level(self) -> Level {
        match self {
            LogSeverity::Error => Level::Error,
            LogSeverity::Process => Level::Debug,
            _ => Level::Info,
        }
    }
}

/// One line of the engine's activity feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id: String,
    pub message: String,
    pub severity: LogSeverity,
    pub timestamp: DateTime<Utc>,
}

impl JournalEntry {
    fn new(severity: LogSeverity, message: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            message,
            severity,
            timestamp: Utc::now(),
        }
    }
}

/// Capped ring buffer of [`JournalEntry`] values, the engine's way of
/// reporting its routing and recovery decisions back to the caller.
///
/// Handles are cheap clones sharing one buffer. Every record is also
/// forwarded to the `log` facade so entries land on the console when a
/// logger is installed.
#[derive(Clone)]
pub struct Journal {
    entries: Arc<Mutex<VecDeque<JournalEntry>>>,
    capacity: usize,
}

impl Journal {
    pub const DEFAULT_CAPACITY: usize = 20;

    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Arc::new(Mutex::new(VecDeque::new())),
            capacity: capacity.max(1),
        }
    }

    pub fn record(&self, severity: LogSeverity, message: impl Into<String>) {
        let message = message.into();
        log::log!(severity.to_log_level(), "{}", message);

        let mut entries = self.entries.lock().unwrap();
        if entries.len() == self.capacity {
            entries.pop_front();
        }
        entries.push_back(JournalEntry::new(severity, message));
    }

    pub fn info(&self, message: impl Into<String>) {
        self.record(LogSeverity::Info, message);
    }

    pub fn success(&self, message: impl Into<String>) {
        self.record(LogSeverity::Success, message);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.record(LogSeverity::Error, message);
    }

    pub fn process(&self, message: impl Into<String>) {
        self.record(LogSeverity::Process, message);
    }

    /// Snapshot of the retained entries, oldest first.
    pub fn entries(&self) -> Vec<JournalEntry> {
        self.entries.lock().unwrap().iter().cloned().collect()
    }

    pub fn clear(&self) {
        self.entries.lock().unwrap().clear();
    }
}

impl Default for Journal {
    fn default() -> Self {
        Self::new()
    }
}

/// Console logger configuration.
#[derive(Debug, Clone)]
pub struct LoggerConfig {
    pub min_level: log::LevelFilter,
    pub show_colors: bool,
    pub include_timestamp: bool,
    pub timestamp_format: String,
    pub custom_prefix: Option<String>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            min_level: log::LevelFilter::Info,
            show_colors: true,
            include_timestamp: true,
            timestamp_format: "%H:%M:%S".to_string(),
            custom_prefix: None,
        }
    }
}

impl LoggerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_level(mut self, level: log::LevelFilter) -> Self {
        self.min_level = level;
        self
    }

    pub fn with_colors(mut self, enabled: bool) -> Self {
        self.show_colors = enabled;
        self
    }

    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.custom_prefix = Some(prefix.to_string());
        self
    }

    pub fn development() -> Self {
        Self {
            min_level: log::LevelFilter::Debug,
            ..Default::default()
        }
    }

    pub fn production() -> Self {
        Self {
            min_level: log::LevelFilter::Info,
            show_colors: false,
            ..Default::default()
        }
    }
}

struct ConsoleLogger {
    config: Mutex<LoggerConfig>,
}

impl ConsoleLogger {
    fn new() -> Self {
        Self {
            config: Mutex::new(LoggerConfig::default()),
        }
    }

    fn update_config(&self, new_config: LoggerConfig) {
        *self.config.lock().unwrap() = new_config;
    }

    fn format_line(&self, record: &Record, config: &LoggerConfig) -> String {
        let mut output = String::new();

        if let Some(prefix) = &config.custom_prefix {
            if config.show_colors {
                output.push_str(&format!("[{}] ", prefix.bright_white().bold()));
            } else {
                output.push_str(&format!("[{}] ", prefix));
            }
        }

        if config.include_timestamp {
            let timestamp = Utc::now().format(&config.timestamp_format).to_string();
            if config.show_colors {
                output.push_str(&format!("{} ", timestamp.bright_black()));
            } else {
                output.push_str(&format!("{} ", timestamp));
            }
        }

        let level = record.level();
        if config.show_colors {
            let color = match level {
                Level::Error => Color::Red,
                Level::Warn => Color::Yellow,
                Level::Info => Color::Green,
                Level::Debug => Color::Blue,
                Level::Trace => Color::Cyan,
            };
            output.push_str(&format!("[{}] ", level.to_string().color(color).bold()));
        } else {
            output.push_str(&format!("[{}] ", level));
        }

        output.push_str(&record.args().to_string());
        output
    }
}

impl log::Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.config.lock().unwrap().min_level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let config = self.config.lock().unwrap();
            println!("{}", self.format_line(record, &config));
        }
    }

    fn flush(&self) {
        let _ = io::stdout().flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_labels() {
        assert_eq!(LogSeverity::Success.as_str(), "OK");
        assert_eq!(LogSeverity::Error.color(), Color::Red);
    }

    #[test]
    fn journal_caps_at_capacity() {
        let journal = Journal::with_capacity(3);
        for i in 0..5 {
            journal.info(format!("entry {}", i));
        }
        let entries = journal.entries();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].message, "entry 2");
        assert_eq!(entries[2].message, "entry 4");
    }

    #[test]
    fn journal_clones_share_the_buffer() {
        let journal = Journal::new();
        let handle = journal.clone();
        handle.success("done");
        assert_eq!(journal.entries().len(), 1);
        assert_eq!(journal.entries()[0].severity, LogSeverity::Success);
    }

    #[test]
    fn journal_clear() {
        let journal = Journal::new();
        journal.info("one");
        journal.clear();
        assert!(journal.entries().is_empty());
    }

    #[test]
    fn logger_config_builders() {
        let config = LoggerConfig::development();
        assert_eq!(config.min_level, log::LevelFilter::Debug);
        assert!(config.show_colors);

        let prod = LoggerConfig::production();
        assert!(!prod.show_colors);
    }
}
