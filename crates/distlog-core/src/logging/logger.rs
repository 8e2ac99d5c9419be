//! Named loggers.
//!
//! A logger owns an explicit list of shared sink handles and writes each
//! emitted record straight to them. There is no parent chain and no
//! forwarding, so a record reaches every attached sink exactly once.

use std::fmt;
use std::panic::Location;
use std::sync::Arc;

use parking_lot::RwLock;

use super::format::format_record;
use super::level::{Level, Threshold};
use super::record::LogRecord;
use super::sink::Sink;
use crate::error::LogResult;

pub struct Logger {
    name: String,
    threshold: Threshold,
    sinks: RwLock<Vec<Arc<dyn Sink>>>,
}

impl Logger {
    /// Create a logger with no sinks attached.
    pub fn new(name: impl Into<String>, threshold: Threshold) -> Self {
        Self {
            name: name.into(),
            threshold,
            sinks: RwLock::new(Vec::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn threshold(&self) -> Threshold {
        self.threshold
    }

    /// Attach a sink. Attaching the same sink twice is a no-op.
    ///
    /// Returns `true` if the sink was newly attached.
    pub fn attach(&self, sink: Arc<dyn Sink>) -> bool {
        let mut sinks = self.sinks.write();
        if sinks.iter().any(|existing| same_sink(existing, &sink)) {
            return false;
        }
        sinks.push(sink);
        true
    }

    /// Whether `sink` is currently attached.
    pub fn has_sink(&self, sink: &Arc<dyn Sink>) -> bool {
        self.sinks.read().iter().any(|existing| same_sink(existing, sink))
    }

    /// Snapshot of the attached sinks, in attachment order.
    pub fn sinks(&self) -> Vec<Arc<dyn Sink>> {
        self.sinks.read().clone()
    }

    pub fn enabled(&self, level: Level) -> bool {
        self.threshold.allows(level)
    }

    /// Log `message` at `level`, recording the caller's file and line.
    ///
    /// The message is only rendered when the logger threshold admits the level.
    #[track_caller]
    pub fn log(&self, level: Level, message: impl fmt::Display) -> LogResult<()> {
        let location = Location::caller();
        if !self.enabled(level) {
            return Ok(());
        }
        self.emit(LogRecord::at(&self.name, level, location, message.to_string()))
    }

    #[track_caller]
    pub fn debug(&self, message: impl fmt::Display) -> LogResult<()> {
        self.log(Level::Debug, message)
    }

    #[track_caller]
    pub fn info(&self, message: impl fmt::Display) -> LogResult<()> {
        self.log(Level::Info, message)
    }

    #[track_caller]
    pub fn warning(&self, message: impl fmt::Display) -> LogResult<()> {
        self.log(Level::Warning, message)
    }

    #[track_caller]
    pub fn error(&self, message: impl fmt::Display) -> LogResult<()> {
        self.log(Level::Error, message)
    }

    /// Format a prepared record and write it to every sink that accepts its level.
    ///
    /// The first failing sink aborts the call with its I/O error.
    pub fn emit(&self, record: LogRecord) -> LogResult<()> {
        if !self.enabled(record.level) {
            return Ok(());
        }

        let line = format_record(&record);
        for sink in self.sinks.read().iter() {
            if sink.accepts(record.level) {
                sink.write_line(&line)?;
            }
        }
        Ok(())
    }

    pub fn flush(&self) -> LogResult<()> {
        for sink in self.sinks.read().iter() {
            sink.flush()?;
        }
        Ok(())
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("name", &self.name)
            .field("threshold", &self.threshold)
            .field("sinks", &self.sinks.read().len())
            .finish()
    }
}

/// Pointer identity, ignoring the vtable half of the fat pointer.
pub(crate) fn same_sink(a: &Arc<dyn Sink>, b: &Arc<dyn Sink>) -> bool {
    std::ptr::eq(Arc::as_ptr(a) as *const u8, Arc::as_ptr(b) as *const u8)
}
