//! Startup configuration.
//!
//! Read once when the registry is built. The log directory is never
//! re-read afterwards, so per-process sinks keyed by pid stay valid for the
//! whole run.

use std::path::{Path, PathBuf};

use super::level::Threshold;

/// Environment variable holding the minimum level (`debug`, `info`, `warning`, `error`).
pub const LOG_LEVEL_ENV: &str = "DISTLOG_LOG_LEVEL";

/// Environment variable holding the log directory. Unset means console only.
pub const LOG_DIR_ENV: &str = "DISTLOG_LOG_DIR";

/// File name of the shared sink inside the log directory.
pub const SHARED_LOG_FILE: &str = "default.log";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LogConfig {
    pub threshold: Threshold,
    pub log_dir: Option<PathBuf>,
}

impl LogConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let level = lookup(LOG_LEVEL_ENV);
        let log_dir = lookup(LOG_DIR_ENV)
            .filter(|dir| !dir.is_empty())
            .map(PathBuf::from);

        Self {
            threshold: Threshold::from_env_value(level.as_deref()),
            log_dir,
        }
    }

    pub fn with_threshold(mut self, threshold: Threshold) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_log_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.log_dir = Some(dir.into());
        self
    }

    /// Drop any configured directory.
    pub fn console_only(mut self) -> Self {
        self.log_dir = None;
        self
    }

    pub fn file_logging(&self) -> bool {
        self.log_dir.is_some()
    }

    /// `<dir>/default.log`, when file logging is on.
    pub fn shared_log_path(&self) -> Option<PathBuf> {
        self.log_dir.as_deref().map(|dir| dir.join(SHARED_LOG_FILE))
    }

    /// `<dir>/process.<pid>.log`, when file logging is on.
    pub fn process_log_path(&self, pid: u32) -> Option<PathBuf> {
        self.log_dir.as_deref().map(|dir| process_log_path(dir, pid))
    }
}

pub fn process_log_path(dir: &Path, pid: u32) -> PathBuf {
    dir.join(format!("process.{}.log", pid))
}
