//! Rank-gated logging for multi-process runs.
//!
//! In a distributed job every worker runs the same code, so an unguarded
//! `info` prints N copies. [`log_rank_0`] only writes on the coordinator
//! (rank 0), or always when the process is not part of a distributed run.
//!
//! ```ignore
//! use distlog_core::rank::{log_rank_0, EnvContext};
//!
//! let ctx = EnvContext::from_env();
//! log_rank_0(&ctx, &logger, Level::Info, "epoch finished")?;
//! ```

use std::borrow::Cow;
use std::fmt;
use std::panic::Location;

use crate::error::{LogError, LogResult};
use crate::logging::{IntoLevel, Logger, LogRecord};

/// Environment variable carrying this worker's global rank.
pub const RANK_ENV: &str = "RANK";

/// Environment variable carrying the number of workers in the job.
pub const WORLD_SIZE_ENV: &str = "WORLD_SIZE";

/// Query interface to the distributed runtime.
pub trait DistributedContext: Send + Sync {
    /// Whether this process is part of an initialized distributed group.
    fn is_initialized(&self) -> bool;

    /// Global rank of this process. Only meaningful when initialized.
    fn rank(&self) -> u32;
}

/// No distributed runtime. Every call emits.
#[derive(Debug, Clone, Copy, Default)]
pub struct NotDistributed;

impl DistributedContext for NotDistributed {
    fn is_initialized(&self) -> bool {
        false
    }

    fn rank(&self) -> u32 {
        0
    }
}

/// An initialized group with a known rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaticContext {
    pub rank: u32,
}

impl StaticContext {
    pub fn new(rank: u32) -> Self {
        Self { rank }
    }
}

impl DistributedContext for StaticContext {
    fn is_initialized(&self) -> bool {
        true
    }

    fn rank(&self) -> u32 {
        self.rank
    }
}

/// Rank information exported by a process launcher through `RANK` and `WORLD_SIZE`.
///
/// The process counts as distributed only when both variables parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EnvContext {
    group: Option<(u32, u32)>,
}

impl EnvContext {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let parse = |key: &str| lookup(key).and_then(|v| v.trim().parse::<u32>().ok());
        let group = match (parse(RANK_ENV), parse(WORLD_SIZE_ENV)) {
            (Some(rank), Some(world_size)) => Some((rank, world_size)),
            _ => None,
        };
        Self { group }
    }

    pub fn world_size(&self) -> Option<u32> {
        self.group.map(|(_, world_size)| world_size)
    }
}

impl DistributedContext for EnvContext {
    fn is_initialized(&self) -> bool {
        self.group.is_some()
    }

    fn rank(&self) -> u32 {
        self.group.map_or(0, |(rank, _)| rank)
    }
}

/// Anything a caller may pass as the message of a rank-gated call.
///
/// Borrowed input stays borrowed, so validation on a non-emitting rank
/// does not copy the message. Byte input must be valid UTF-8, otherwise
/// the call fails with [`LogError::InvalidArgument`].
pub trait IntoMessage<'a> {
    fn into_message(self) -> LogResult<Cow<'a, str>>;
}

impl<'a> IntoMessage<'a> for &'a str {
    fn into_message(self) -> LogResult<Cow<'a, str>> {
        Ok(Cow::Borrowed(self))
    }
}

impl<'a> IntoMessage<'a> for String {
    fn into_message(self) -> LogResult<Cow<'a, str>> {
        Ok(Cow::Owned(self))
    }
}

impl<'a> IntoMessage<'a> for &'a String {
    fn into_message(self) -> LogResult<Cow<'a, str>> {
        Ok(Cow::Borrowed(self.as_str()))
    }
}

impl<'a> IntoMessage<'a> for fmt::Arguments<'_> {
    fn into_message(self) -> LogResult<Cow<'a, str>> {
        Ok(match self.as_str() {
            Some(literal) => Cow::Borrowed(literal),
            None => Cow::Owned(self.to_string()),
        })
    }
}

impl<'a> IntoMessage<'a> for &'a [u8] {
    fn into_message(self) -> LogResult<Cow<'a, str>> {
        std::str::from_utf8(self)
            .map(Cow::Borrowed)
            .map_err(|e| LogError::InvalidArgument(format!("message is not valid UTF-8: {}", e)))
    }
}

impl<'a> IntoMessage<'a> for Vec<u8> {
    fn into_message(self) -> LogResult<Cow<'a, str>> {
        String::from_utf8(self)
            .map(Cow::Owned)
            .map_err(|e| LogError::InvalidArgument(format!("message is not valid UTF-8: {}", e)))
    }
}

/// Whether the local process should write rank-0-only output.
pub fn is_rank_0(ctx: &dyn DistributedContext) -> bool {
    !ctx.is_initialized() || ctx.rank() == 0
}

/// Log `message` at `level`, but only on rank 0 (or always outside a distributed run).
///
/// Arguments are validated on every rank before the rank check, so a bad
/// level or message fails the same way everywhere and nothing is written.
/// Returns `true` when this rank handed the record to the logger.
/// The message is only copied into a record on the emitting rank.
#[track_caller]
pub fn log_rank_0<'a>(
    ctx: &dyn DistributedContext,
    logger: &Logger,
    level: impl IntoLevel,
    message: impl IntoMessage<'a>,
) -> LogResult<bool> {
    let location = Location::caller();
    let level = level.into_level()?;
    let message = message.into_message()?;

    if !is_rank_0(ctx) {
        return Ok(false);
    }
    if logger.enabled(level) {
        logger.emit(LogRecord::at(logger.name(), level, location, message.into_owned()))?;
    }
    Ok(true)
}

/// Like [`log_rank_0`], but the message is only built on the emitting rank.
#[track_caller]
pub fn log_rank_0_with<F>(
    ctx: &dyn DistributedContext,
    logger: &Logger,
    level: impl IntoLevel,
    message: F,
) -> LogResult<bool>
where
    F: FnOnce() -> String,
{
    let location = Location::caller();
    let level = level.into_level()?;

    if !is_rank_0(ctx) {
        return Ok(false);
    }
    if logger.enabled(level) {
        logger.emit(LogRecord::at(logger.name(), level, location, message()))?;
    }
    Ok(true)
}
