//! Log record type.
//!
//! A record is built once per emitted log call, handed to the formatter and
//! dropped. Nothing holds on to it.

use std::panic::Location;
use std::path::Path;

use chrono::NaiveDateTime;

use super::level::Level;

/// A single log event, with the metadata the line format needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    /// Name of the logger that produced the record
    pub name: String,

    pub level: Level,

    /// Local wall-clock time the record was created
    pub timestamp: NaiveDateTime,

    /// Source file as reported by the caller (full or relative path)
    pub file: String,

    pub line: u32,

    /// Fully rendered message text
    pub message: String,
}

impl LogRecord {
    /// Create a record stamped with the current local time.
    pub fn new(
        name: impl Into<String>,
        level: Level,
        file: impl Into<String>,
        line: u32,
        message: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            level,
            timestamp: chrono::Local::now().naive_local(),
            file: file.into(),
            line,
            message: message.into(),
        }
    }

    /// Create a record located at a caller captured with `#[track_caller]`.
    pub fn at(
        name: impl Into<String>,
        level: Level,
        location: &Location<'_>,
        message: impl Into<String>,
    ) -> Self {
        Self::new(name, level, location.file(), location.line(), message)
    }

    /// Replace the timestamp (used for deterministic output).
    pub fn with_timestamp(mut self, timestamp: NaiveDateTime) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Base name of the source file, as shown in the line prefix.
    pub fn filename(&self) -> &str {
        Path::new(&self.file)
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or(&self.file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filename_strips_directories() {
        let record = LogRecord::new("solver", Level::Info, "src/solver/step.rs", 12, "hi");
        assert_eq!(record.filename(), "step.rs");

        let bare = LogRecord::new("solver", Level::Info, "main.rs", 1, "hi");
        assert_eq!(bare.filename(), "main.rs");
    }

    #[test]
    fn test_at_captures_location() {
        let location = Location::caller();
        let record = LogRecord::at("solver", Level::Debug, location, "here");
        assert_eq!(record.line, location.line());
        assert_eq!(record.file, location.file());
    }
}
