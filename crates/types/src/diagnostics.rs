//! Leveled diagnostics sink
//!
//! Components receive a [`Diagnostics`] implementation instead of printing
//! directly. [`TracingDiagnostics`] forwards to `tracing`; [`MemoryDiagnostics`]
//! keeps every emitted message, which is what the tests assert against.
//! DEBUG messages are dropped unless debug mode is enabled on the sink.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Mutex;

/// Environment variable that turns on DEBUG diagnostics
pub const DEBUG_MODE_ENV: &str = "DEBUG_MODE";

/// Diagnostic level with its historical status code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
#[repr(u8)]
pub enum LogLevel {
    Info = 0,
    Warning = 1,
    Error = 2,
    Critical = 3,
    Debug = 4,
}

impl LogLevel {
    /// Numeric status code
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Level for a status code, if it is one of the known ones
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(LogLevel::Info),
            1 => Some(LogLevel::Warning),
            2 => Some(LogLevel::Error),
            3 => Some(LogLevel::Critical),
            4 => Some(LogLevel::Debug),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
            LogLevel::Critical => "CRITICAL",
            LogLevel::Debug => "DEBUG",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse the `DEBUG_MODE` value: only a case-insensitive `true` enables it
pub fn debug_mode_from_value(value: Option<&str>) -> bool {
    value
        .map(|v| v.trim().eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

/// Read `DEBUG_MODE` from the process environment
pub fn debug_mode_from_env() -> bool {
    debug_mode_from_value(std::env::var(DEBUG_MODE_ENV).ok().as_deref())
}

/// Sink for leveled diagnostic messages
pub trait Diagnostics: Send + Sync {
    /// Whether DEBUG messages are emitted
    fn debug_enabled(&self) -> bool;

    /// Record a message that already passed level gating
    fn record(&self, level: LogLevel, message: &str);

    /// Emit a message, dropping DEBUG unless enabled
    fn emit(&self, level: LogLevel, message: &str) {
        if level == LogLevel::Debug && !self.debug_enabled() {
            return;
        }
        self.record(level, message);
    }

    fn info(&self, message: &str) {
        self.emit(LogLevel::Info, message);
    }

    fn warning(&self, message: &str) {
        self.emit(LogLevel::Warning, message);
    }

    fn error(&self, message: &str) {
        self.emit(LogLevel::Error, message);
    }

    fn critical(&self, message: &str) {
        self.emit(LogLevel::Critical, message);
    }

    fn debug(&self, message: &str) {
        self.emit(LogLevel::Debug, message);
    }
}

/// Diagnostics forwarded to the `tracing` subscriber
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDiagnostics {
    debug_enabled: bool,
}

impl TracingDiagnostics {
    pub fn new(debug_enabled: bool) -> Self {
        Self { debug_enabled }
    }

    /// Sink configured from `DEBUG_MODE`
    pub fn from_env() -> Self {
        Self::new(debug_mode_from_env())
    }
}

impl Diagnostics for TracingDiagnostics {
    fn debug_enabled(&self) -> bool {
        self.debug_enabled
    }

    fn record(&self, level: LogLevel, message: &str) {
        match level {
            LogLevel::Info => tracing::info!(code = level.code(), "{}", message),
            LogLevel::Warning => tracing::warn!(code = level.code(), "{}", message),
            LogLevel::Error => tracing::error!(code = level.code(), "{}", message),
            LogLevel::Critical => {
                tracing::error!(code = level.code(), critical = true, "{}", message)
            }
            LogLevel::Debug => tracing::debug!(code = level.code(), "{}", message),
        }
    }
}

/// A recorded diagnostic
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticRecord {
    pub level: LogLevel,
    pub message: String,
}

/// Diagnostics kept in memory, in emission order
#[derive(Debug, Default)]
pub struct MemoryDiagnostics {
    debug_enabled: bool,
    records: Mutex<Vec<DiagnosticRecord>>,
}

impl MemoryDiagnostics {
    pub fn new(debug_enabled: bool) -> Self {
        Self {
            debug_enabled,
            records: Mutex::new(Vec::new()),
        }
    }

    /// Snapshot of everything recorded so far
    pub fn records(&self) -> Vec<DiagnosticRecord> {
        match self.records.lock() {
            Ok(records) => records.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Messages recorded at the given level
    pub fn messages_at(&self, level: LogLevel) -> Vec<String> {
        self.records()
            .into_iter()
            .filter(|r| r.level == level)
            .map(|r| r.message)
            .collect()
    }

    /// Whether any recorded message contains `needle`
    pub fn contains(&self, needle: &str) -> bool {
        self.records().iter().any(|r| r.message.contains(needle))
    }

    pub fn clear(&self) {
        match self.records.lock() {
            Ok(mut records) => records.clear(),
            Err(poisoned) => poisoned.into_inner().clear(),
        }
    }
}

impl Diagnostics for MemoryDiagnostics {
    fn debug_enabled(&self) -> bool {
        self.debug_enabled
    }

    fn record(&self, level: LogLevel, message: &str) {
        let record = DiagnosticRecord {
            level,
            message: message.to_string(),
        };
        match self.records.lock() {
            Ok(mut records) => records.push(record),
            Err(poisoned) => poisoned.into_inner().push(record),
        }
    }
}
