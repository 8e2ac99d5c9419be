//! Per-process file sink cache.
//!
//! Every OS process gets its own `process.<pid>.log`. Within one process all
//! loggers share the single open handle for that file. Entries are only ever
//! added; a sink lives until the process exits.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;

use super::config::process_log_path;
use super::level::Threshold;
use super::sink::FileSink;
use crate::error::{LogError, LogResult};

/// Outcome of a cache lookup.
#[derive(Debug, Clone)]
pub enum CacheLookup {
    /// The pid already had a sink.
    Hit(Arc<FileSink>),
    /// A sink was opened for this pid by this call.
    Created(Arc<FileSink>),
}

impl CacheLookup {
    pub fn sink(&self) -> &Arc<FileSink> {
        match self {
            CacheLookup::Hit(sink) | CacheLookup::Created(sink) => sink,
        }
    }

    pub fn into_sink(self) -> Arc<FileSink> {
        match self {
            CacheLookup::Hit(sink) | CacheLookup::Created(sink) => sink,
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self, CacheLookup::Created(_))
    }
}

/// Map from process identifier to that process's file sink.
#[derive(Debug)]
pub struct ProcessSinkCache {
    dir: PathBuf,
    threshold: Threshold,
    sinks: Mutex<HashMap<u32, Arc<FileSink>>>,
}

impl ProcessSinkCache {
    pub fn new(dir: impl Into<PathBuf>, threshold: Threshold) -> Self {
        Self {
            dir: dir.into(),
            threshold,
            sinks: Mutex::new(HashMap::new()),
        }
    }

    pub fn get(&self, pid: u32) -> Option<Arc<FileSink>> {
        self.sinks.lock().get(&pid).cloned()
    }

    /// Return the sink for `pid`, opening `process.<pid>.log` on first use.
    ///
    /// The lock is held across directory creation and the open, so two
    /// threads racing on the same pid end up with one file handle.
    /// A directory failure is returned as [`LogError::CreateDir`] and nothing
    /// is cached, so a later call retries.
    pub fn get_or_create(&self, pid: u32) -> LogResult<CacheLookup> {
        let mut sinks = self.sinks.lock();
        if let Some(sink) = sinks.get(&pid) {
            return Ok(CacheLookup::Hit(sink.clone()));
        }

        ensure_dir(&self.dir)?;
        let sink = Arc::new(FileSink::open(
            process_log_path(&self.dir, pid),
            self.threshold,
        )?);
        sinks.insert(pid, sink.clone());

        tracing::debug!(pid, dir = %self.dir.display(), "created per-process log sink");
        Ok(CacheLookup::Created(sink))
    }

    pub fn len(&self) -> usize {
        self.sinks.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.lock().is_empty()
    }

    /// Process identifiers with a sink, in ascending order.
    pub fn pids(&self) -> Vec<u32> {
        let mut pids: Vec<u32> = self.sinks.lock().keys().copied().collect();
        pids.sort_unstable();
        pids
    }
}

/// Create `dir` (and parents) if it does not exist yet.
pub fn ensure_dir(dir: &Path) -> LogResult<()> {
    if dir.is_dir() {
        return Ok(());
    }
    fs::create_dir_all(dir).map_err(|source| LogError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })
}
