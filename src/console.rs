//! In-app console log
//!
//! `log` backend that keeps the most recent lines in memory so the Console
//! view can show them.

use std::sync::{Arc, Mutex};

use chrono::Local;
use log::{Level, LevelFilter, Log, Metadata, Record};

/// Lines kept before the oldest are dropped
const MAX_LINES: usize = 500;

/// Shared handle to the console buffer
#[derive(Clone, Default)]
pub struct ConsoleLog {
    lines: Arc<Mutex<Vec<String>>>,
}

impl ConsoleLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install as the global logger. Only the first call in a process wins.
    pub fn install(&self, level: LevelFilter) -> Result<(), log::SetLoggerError> {
        log::set_boxed_logger(Box::new(self.clone()))?;
        log::set_max_level(level);
        Ok(())
    }

    pub fn push(&self, level: Level, message: &str) {
        let line = format!("[{}] [{}] {}", Local::now().format("%H:%M:%S"), level, message);
        if let Ok(mut lines) = self.lines.lock() {
            lines.push(line);
            if lines.len() > MAX_LINES {
                let excess = lines.len() - MAX_LINES;
                lines.drain(..excess);
            }
        }
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().map(|lines| lines.clone()).unwrap_or_default()
    }

    pub fn clear(&self) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.clear();
        }
    }
}

impl Log for ConsoleLog {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            self.push(record.level(), &record.args().to_string());
        }
    }

    fn flush(&self) {}
}
