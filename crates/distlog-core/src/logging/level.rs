//! Severity levels and thresholds.

use std::fmt;
use std::str::FromStr;

use crate::error::{LogError, LogResult};

/// Severity of a log record, ordered from least to most severe.
///
/// The numeric codes match the conventional `10/20/30/40` ladder so callers
/// that carry levels around as integers can convert with [`Level::from_code`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    Debug = 10,
    Info = 20,
    Warning = 30,
    Error = 40,
}

impl Level {
    pub const ALL: [Level; 4] = [Level::Debug, Level::Info, Level::Warning, Level::Error];

    /// Upper-case name as it appears in formatted output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warning => "WARNING",
            Level::Error => "ERROR",
        }
    }

    pub fn code(&self) -> i64 {
        *self as i64
    }

    /// Convert a numeric level code. Only the four recognized codes are accepted.
    pub fn from_code(code: i64) -> LogResult<Self> {
        Self::ALL
            .into_iter()
            .find(|level| level.code() == code)
            .ok_or_else(|| {
                LogError::InvalidArgument(format!("{} is not a recognized level code", code))
            })
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = LogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "debug" => Ok(Level::Debug),
            "info" => Ok(Level::Info),
            "warning" | "warn" => Ok(Level::Warning),
            "error" => Ok(Level::Error),
            other => Err(LogError::InvalidArgument(format!(
                "'{}' is not a recognized level name",
                other
            ))),
        }
    }
}

impl From<tracing::Level> for Level {
    fn from(level: tracing::Level) -> Self {
        match level {
            tracing::Level::TRACE | tracing::Level::DEBUG => Level::Debug,
            tracing::Level::INFO => Level::Info,
            tracing::Level::WARN => Level::Warning,
            tracing::Level::ERROR => Level::Error,
        }
    }
}

/// Anything a caller may hand to a rank-gated log call as a level.
///
/// Conversion is checked: an integer that is not one of the four level codes,
/// or a name that is not a level, is an [`LogError::InvalidArgument`].
pub trait IntoLevel {
    fn into_level(self) -> LogResult<Level>;
}

impl IntoLevel for Level {
    fn into_level(self) -> LogResult<Level> {
        Ok(self)
    }
}

impl IntoLevel for i64 {
    fn into_level(self) -> LogResult<Level> {
        Level::from_code(self)
    }
}

impl IntoLevel for i32 {
    fn into_level(self) -> LogResult<Level> {
        Level::from_code(i64::from(self))
    }
}

impl IntoLevel for &str {
    fn into_level(self) -> LogResult<Level> {
        self.parse()
    }
}

/// Minimum severity a record must meet to be emitted.
///
/// `Threshold::ALL` lets every record through; it is what an unrecognized
/// level string in the environment degrades to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Threshold(Option<Level>);

impl Threshold {
    pub const ALL: Threshold = Threshold(None);

    pub const fn at_least(level: Level) -> Self {
        Threshold(Some(level))
    }

    pub fn min_level(&self) -> Option<Level> {
        self.0
    }

    pub fn allows(&self, level: Level) -> bool {
        match self.0 {
            Some(min) => level >= min,
            None => true,
        }
    }

    /// Interpret an environment value: absent means INFO, an unrecognized
    /// value means no filtering at all.
    pub fn from_env_value(value: Option<&str>) -> Self {
        match value {
            None => Threshold::at_least(Level::Info),
            Some(raw) => raw
                .parse::<Level>()
                .map(Threshold::at_least)
                .unwrap_or(Threshold::ALL),
        }
    }
}

impl Default for Threshold {
    fn default() -> Self {
        Threshold::at_least(Level::Info)
    }
}

impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(level) => write!(f, "{}", level),
            None => f.write_str("ALL"),
        }
    }
}
