//! distlog Core Library
//!
//! Process-wide logging for multi-process numerical workloads.
//!
//! ## Overview
//!
//! - **Named loggers** from one registry per process, all sharing the same
//!   console sink and, with a log directory configured, one file per OS process
//! - **Aligned multi-line output**: continuation lines repeat the
//!   `LEVEL MM-DD HH:MM:SS [file:line] ` prefix after a carriage return
//! - **Rank gating**: [`rank::log_rank_0`] writes only on the coordinator of a
//!   distributed run
//!
//! ## Configuration
//!
//! Read once from the environment on first use:
//!
//! - `DISTLOG_LOG_LEVEL`: `debug`, `info` (default), `warning`, `error`
//! - `DISTLOG_LOG_DIR`: enables `default.log` and `process.<pid>.log` files
//!
//! ## Quick Start
//!
//! ```ignore
//! use distlog_core::rank::{log_rank_0, EnvContext};
//! use distlog_core::{init_logger, Level};
//!
//! fn main() -> Result<(), distlog_core::LogError> {
//!     let logger = init_logger("trainer")?;
//!     logger.info("worker up")?;
//!
//!     let ctx = EnvContext::from_env();
//!     log_rank_0(&ctx, &logger, Level::Info, "epoch 1 done")?;
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod logging;
pub mod rank;

// Re-exports
pub use error::{LogError, LogResult};
pub use logging::{
    global, init_logger, DistlogLayer, Level, LogConfig, LogRegistry, Logger, Sink, Threshold,
};
pub use rank::{log_rank_0, log_rank_0_with, DistributedContext, EnvContext, NotDistributed};
