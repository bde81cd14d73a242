//! Injected diagnostics sink
//!
//! The resolver load pass and the config merger report through this trait
//! rather than a process-wide logger, so callers choose where output goes
//! and tests can capture it.

use std::sync::Mutex;

/// Severity of a diagnostic message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Warn,
    Error,
}

/// Sink for operator-facing diagnostics
pub trait Diagnostics {
    /// Emit one message at the given severity
    fn emit(&self, level: Level, message: &str);

    fn info(&self, message: &str) {
        self.emit(Level::Info, message);
    }

    fn warn(&self, message: &str) {
        self.emit(Level::Warn, message);
    }

    fn error(&self, message: &str) {
        self.emit(Level::Error, message);
    }
}

/// Forwards diagnostics to the active `tracing` subscriber
#[derive(Debug, Default)]
pub struct TracingSink;

impl Diagnostics for TracingSink {
    fn emit(&self, level: Level, message: &str) {
        match level {
            Level::Info => tracing::info!("{message}"),
            Level::Warn => tracing::warn!("{message}"),
            Level::Error => tracing::error!("{message}"),
        }
    }
}

/// Records diagnostics in memory for inspection in tests
#[derive(Debug, Default)]
pub struct CaptureSink {
    entries: Mutex<Vec<(Level, String)>>,
}

impl CaptureSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything emitted so far
    pub fn entries(&self) -> Vec<(Level, String)> {
        self.entries.lock().unwrap().clone()
    }

    /// Whether any message at `level` contains `needle`
    pub fn contains(&self, level: Level, needle: &str) -> bool {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .any(|(l, m)| *l == level && m.contains(needle))
    }
}

impl Diagnostics for CaptureSink {
    fn emit(&self, level: Level, message: &str) {
        self.entries.lock().unwrap().push((level, message.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_records_levels() {
        let sink = CaptureSink::new();
        sink.info("loaded");
        sink.warn("stale key");
        sink.error("append failed");

        let entries = sink.entries();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].0, Level::Info);
        assert_eq!(entries[1].0, Level::Warn);
        assert_eq!(entries[2].0, Level::Error);
    }

    #[test]
    fn test_contains_matches_level_and_substring() {
        let sink = CaptureSink::new();
        sink.warn("dropping stale config key 'foo'");

        assert!(sink.contains(Level::Warn, "stale config key"));
        assert!(!sink.contains(Level::Info, "stale config key"));
        assert!(!sink.contains(Level::Warn, "missing"));
    }
}
