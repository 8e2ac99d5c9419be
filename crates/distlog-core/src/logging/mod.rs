//! Process-wide logging with per-process log files.
//!
//! Many workers of one distributed job may share a log directory. Each OS
//! process writes its own `process.<pid>.log`, the root logger also writes
//! the shared `default.log`, and everything goes to the console.
//!
//! ## Layout
//!
//! ```text
//! $DISTLOG_LOG_DIR/
//! ├── default.log            # root logger (shared)
//! ├── process.31337.log      # every logger created in pid 31337
//! └── process.31338.log
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! use distlog_core::logging::init_logger;
//!
//! let logger = init_logger("solver")?;
//! logger.info("starting")?;
//! logger.warning(format_args!("step {} diverged\nresidual {:.3e}", step, r))?;
//! ```
//!
//! ### Bridging `tracing`
//!
//! ```ignore
//! use distlog_core::logging::DistlogLayer;
//! use tracing_subscriber::prelude::*;
//!
//! tracing_subscriber::registry()
//!     .with(DistlogLayer::from_global("app")?)
//!     .init();
//! ```

pub mod cache;
pub mod config;
pub mod format;
pub mod layer;
pub mod level;
pub mod logger;
pub mod record;
pub mod registry;
pub mod sink;

// Re-exports for convenience
pub use cache::{CacheLookup, ProcessSinkCache};
pub use config::{LogConfig, LOG_DIR_ENV, LOG_LEVEL_ENV};
pub use format::format_record;
pub use layer::DistlogLayer;
pub use level::{IntoLevel, Level, Threshold};
pub use logger::Logger;
pub use record::LogRecord;
pub use registry::{global, init_logger, HandlerSet, LogRegistry, ROOT_LOGGER};
pub use sink::{ConsoleSink, FileSink, Sink};
