//! Error types for distlog

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for distlog operations
#[derive(Error, Debug)]
pub enum LogError {
    /// A caller passed a value the facility cannot accept (bad level code,
    /// non-UTF-8 message bytes, unknown level name)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The log directory could not be created.
    ///
    /// Never returned from logger lookup; it is reported as a warning on the
    /// root logger and the affected file sink is skipped.
    #[error("Error creating directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A file sink could not be opened for appending
    #[error("Failed to open log file {}: {source}", path.display())]
    OpenSink {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A write or flush on a sink failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using LogError
pub type LogResult<T> = Result<T, LogError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = LogError::InvalidArgument("level code 15".to_string());
        assert_eq!(format!("{}", err), "Invalid argument: level code 15");
    }

    #[test]
    fn test_create_dir_display_names_path() {
        let err = LogError::CreateDir {
            path: PathBuf::from("/tmp/logs"),
            source: std::io::Error::new(std::io::ErrorKind::AlreadyExists, "file exists"),
        };
        let text = err.to_string();
        assert!(text.starts_with("Error creating directory /tmp/logs"));
        assert!(text.contains("file exists"));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: LogError = io_err.into();
        assert!(matches!(err, LogError::Io(_)));
    }
}
