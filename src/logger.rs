use chrono::{DateTime, Utc};
use crossbeam_channel::{bounded, Receiver, Sender};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

/// Default number of entries kept in the in-app log
pub const DEFAULT_LOG_CAPACITY: usize = 1000;

/// Severity, ordered so filtering is a comparison
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug = 0,
    Info = 1,
    Warn = 2,
    Error = 3,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "debug" => Some(LogLevel::Debug),
            "info" => Some(LogLevel::Info),
            "warn" => Some(LogLevel::Warn),
            "error" => Some(LogLevel::Error),
            _ => None,
        }
    }

    fn from_u8(value: u8) -> Self {
        match value {
            0 => LogLevel::Debug,
            1 => LogLevel::Info,
            2 => LogLevel::Warn,
            3 => LogLevel::Error,
            _ => LogLevel::Error,
        }
    }
}

/// Log entry with optional structured context
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub message: String,
    pub source: String, // "core" or "presentation"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<HashMap<String, serde_json::Value>>,
}

/// Who produced a log entry
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogSource {
    Core,
    Presentation,
}

impl LogSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogSource::Core => "core",
            LogSource::Presentation => "presentation",
        }
    }
}

/// Bounded history owned by the logger thread, oldest dropped first
struct History {
    entries: VecDeque<LogEntry>,
    capacity: usize,
}

impl History {
    fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    fn record(&mut self, entry: LogEntry) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    fn snapshot(&self) -> Vec<LogEntry> {
        self.entries.iter().cloned().collect()
    }
}

enum LogCommand {
    Record(LogEntry),
    Snapshot(Sender<Vec<LogEntry>>),
    Clear,
}

/// In-app log readable by the presentation layer's diagnostics view
///
/// Writers never block: entries go to a bounded queue drained by a dedicated
/// thread and are dropped when the queue is full.
pub struct Logger {
    sender: Sender<LogCommand>,
    min_level: Arc<AtomicU8>,
}

impl Logger {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_LOG_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, receiver) = bounded(capacity.max(1));
        let min_level = Arc::new(AtomicU8::new(LogLevel::Debug as u8));

        let spawned = std::thread::Builder::new()
            .name("clipscribe-log".to_string())
            .spawn(move || Self::run(receiver, capacity));
        if let Err(e) = spawned {
            log::error!("Failed to start log thread: {}", e);
        }

        Self { sender, min_level }
    }

    fn run(receiver: Receiver<LogCommand>, capacity: usize) {
        let mut history = History::new(capacity);
        for command in receiver {
            match command {
                LogCommand::Record(entry) => history.record(entry),
                LogCommand::Snapshot(reply) => {
                    let _ = reply.send(history.snapshot());
                }
                LogCommand::Clear => history.entries.clear(),
            }
        }
    }

    fn submit(
        &self,
        level: LogLevel,
        message: &str,
        source: LogSource,
        context: Option<HashMap<String, serde_json::Value>>,
    ) {
        if (level as u8) < self.min_level.load(Ordering::Relaxed) {
            return;
        }
        let entry = LogEntry {
            timestamp: Utc::now(),
            level,
            message: message.to_string(),
            source: source.as_str().to_string(),
            context,
        };
        let _ = self.sender.try_send(LogCommand::Record(entry));
    }

    pub fn log(&self, level: LogLevel, message: &str, source: LogSource) {
        self.submit(level, message, source, None);
    }

    /// Log with structured context
    pub fn log_with_context(
        &self,
        level: LogLevel,
        message: &str,
        source: LogSource,
        context: HashMap<String, serde_json::Value>,
    ) {
        self.submit(level, message, source, Some(context));
    }

    /// Entry pushed by the presentation layer, level given as text
    pub fn log_presentation(&self, level: &str, message: &str) {
        let level = LogLevel::parse(level).unwrap_or(LogLevel::Info);
        self.submit(level, message, LogSource::Presentation, None);
    }

    pub fn set_min_level(&self, level: LogLevel) {
        self.min_level.store(level as u8, Ordering::Relaxed);
    }

    pub fn get_min_level(&self) -> LogLevel {
        LogLevel::from_u8(self.min_level.load(Ordering::Relaxed))
    }

    /// Entries in chronological order
    pub fn get_logs(&self) -> Vec<LogEntry> {
        let (reply_tx, reply_rx) = bounded(1);
        match self.sender.send(LogCommand::Snapshot(reply_tx)) {
            Ok(()) => reply_rx.recv().unwrap_or_default(),
            Err(_) => Vec::new(),
        }
    }

    pub fn clear_logs(&self) {
        let _ = self.sender.send(LogCommand::Clear);
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

lazy_static::lazy_static! {
    pub static ref LOGGER: Logger = Logger::new();
}

/// Log to the in-app buffer and the `log` facade
#[macro_export]
macro_rules! app_log {
	($level:expr, $($arg:tt)*) => {
		{
			use $crate::logger::LogLevel;
			let message = format!($($arg)*);
			$crate::logger::LOGGER.log($level, &message, $crate::logger::LogSource::Core);
			match $level {
				LogLevel::Error => log::error!("{}", message),
				LogLevel::Warn => log::warn!("{}", message),
				LogLevel::Info => log::info!("{}", message),
				LogLevel::Debug => log::debug!("{}", message),
			}
		}
	};
}
