//! Process-wide logger registry.
//!
//! The registry owns the fixed universe of sinks for the process: one console
//! sink, an optional shared `default.log` sink, and the per-process file sink
//! cache. Loggers handed out by name only ever hold references into that
//! universe.
//!
//! ```ignore
//! use distlog_core::logging::init_logger;
//!
//! let logger = init_logger("solver")?;
//! logger.info(format_args!("residual {:.3e}", residual))?;
//! ```

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use parking_lot::Mutex;

use super::cache::{ensure_dir, CacheLookup, ProcessSinkCache};
use super::config::{LogConfig, SHARED_LOG_FILE};
use super::logger::Logger;
use super::sink::{ConsoleSink, FileSink, Sink};
use crate::error::{LogError, LogResult};

/// Name of the root logger. Requesting it by name returns the root itself.
pub const ROOT_LOGGER: &str = "DISTLOG";

/// The sinks created once at registry construction.
pub struct HandlerSet {
    console: Arc<dyn Sink>,
    shared_file: Option<Arc<FileSink>>,
}

impl HandlerSet {
    pub fn console(&self) -> &Arc<dyn Sink> {
        &self.console
    }

    pub fn shared_file(&self) -> Option<&Arc<FileSink>> {
        self.shared_file.as_ref()
    }
}

/// Hands out named loggers wired to the process's sinks.
pub struct LogRegistry {
    config: LogConfig,
    root: Arc<Logger>,
    handlers: HandlerSet,
    process_sinks: Option<ProcessSinkCache>,
    loggers: Mutex<HashMap<String, Arc<Logger>>>,
}

impl LogRegistry {
    /// Build a registry whose console sink is stdout.
    pub fn new(config: LogConfig) -> LogResult<Self> {
        let console = Arc::new(ConsoleSink::stdout(config.threshold));
        Self::with_console(config, console)
    }

    /// Build a registry around a caller-supplied console sink.
    ///
    /// If the log directory cannot be created the shared file sink is
    /// skipped and a warning goes to the root logger. Failing to open
    /// `default.log` in an existing directory is returned as an error.
    pub fn with_console(config: LogConfig, console: Arc<dyn Sink>) -> LogResult<Self> {
        let root = Arc::new(Logger::new(ROOT_LOGGER, config.threshold));
        root.attach(console.clone());

        let mut shared_file = None;
        if let Some(dir) = config.log_dir.as_deref() {
            match ensure_dir(dir) {
                Ok(()) => {
                    let sink = Arc::new(FileSink::open(
                        dir.join(SHARED_LOG_FILE),
                        config.threshold,
                    )?);
                    root.attach(sink.clone());
                    shared_file = Some(sink);
                }
                Err(err) => report_dir_failure(&root, &err),
            }
        }

        let process_sinks = config
            .log_dir
            .as_deref()
            .map(|dir| ProcessSinkCache::new(dir, config.threshold));

        let mut loggers = HashMap::new();
        loggers.insert(ROOT_LOGGER.to_string(), root.clone());

        tracing::debug!(
            threshold = %config.threshold,
            file_logging = config.file_logging(),
            "log registry initialized"
        );

        Ok(Self {
            config,
            root,
            handlers: HandlerSet {
                console,
                shared_file,
            },
            process_sinks,
            loggers: Mutex::new(loggers),
        })
    }

    pub fn config(&self) -> &LogConfig {
        &self.config
    }

    pub fn root(&self) -> &Arc<Logger> {
        &self.root
    }

    pub fn handlers(&self) -> &HandlerSet {
        &self.handlers
    }

    /// Logger for `name`, wired to this OS process's file sink.
    pub fn get_logger(&self, name: &str) -> LogResult<Arc<Logger>> {
        self.get_logger_for_pid(name, std::process::id())
    }

    /// Logger for `name` as seen from process `pid`.
    ///
    /// The same name always yields the same logger. Its sinks are the
    /// console sink plus, with file logging on, the sink cached for `pid`.
    /// A freshly opened per-process sink is attached to the root logger too.
    ///
    /// Sinks are only ever added. Asking for the same name under a second
    /// pid leaves the first pid's sink attached, so that logger writes to
    /// both `process.<pid>.log` files. This is what happens to a logger
    /// inherited across `fork()`: records from the child also land in the
    /// parent's file. Request loggers after forking to keep one file per
    /// process.
    pub fn get_logger_for_pid(&self, name: &str, pid: u32) -> LogResult<Arc<Logger>> {
        let logger = self
            .loggers
            .lock()
            .entry(name.to_string())
            .or_insert_with(|| {
                let logger = Arc::new(Logger::new(name, self.config.threshold));
                logger.attach(self.handlers.console.clone());
                logger
            })
            .clone();

        if let Some(cache) = &self.process_sinks {
            match cache.get_or_create(pid) {
                Ok(CacheLookup::Created(sink)) => {
                    self.root.attach(sink.clone());
                    logger.attach(sink);
                }
                Ok(CacheLookup::Hit(sink)) => {
                    logger.attach(sink);
                }
                Err(err @ LogError::CreateDir { .. }) => report_dir_failure(&self.root, &err),
                Err(err) => return Err(err),
            }
        }

        Ok(logger)
    }

    /// The file sink cached for `pid`, if one was created.
    pub fn process_sink(&self, pid: u32) -> Option<Arc<FileSink>> {
        self.process_sinks.as_ref().and_then(|cache| cache.get(pid))
    }

    pub fn process_sink_count(&self) -> usize {
        self.process_sinks.as_ref().map_or(0, ProcessSinkCache::len)
    }

    /// Flush every sink in the universe.
    pub fn flush(&self) -> LogResult<()> {
        self.handlers.console.flush()?;
        if let Some(shared) = &self.handlers.shared_file {
            shared.flush()?;
        }
        self.root.flush()
    }
}

fn report_dir_failure(root: &Logger, err: &LogError) {
    tracing::warn!(error = %err, "log directory unavailable, file sink skipped");
    let _ = root.warning(err);
}

static GLOBAL: OnceLock<LogRegistry> = OnceLock::new();
static GLOBAL_INIT: Mutex<()> = parking_lot::const_mutex(());

/// The process-wide registry, built from the environment on first use.
///
/// Construction happens at most once; concurrent first callers wait on the
/// same barrier. If construction fails the error is returned and the next
/// call tries again.
pub fn global() -> LogResult<&'static LogRegistry> {
    if let Some(registry) = GLOBAL.get() {
        return Ok(registry);
    }

    let _guard = GLOBAL_INIT.lock();
    if let Some(registry) = GLOBAL.get() {
        return Ok(registry);
    }
    let registry = LogRegistry::new(LogConfig::from_env())?;
    Ok(GLOBAL.get_or_init(|| registry))
}

/// Named logger from the process-wide registry. Safe to call repeatedly.
pub fn init_logger(name: &str) -> LogResult<Arc<Logger>> {
    global()?.get_logger(name)
}
