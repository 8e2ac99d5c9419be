//! Output sinks.
//!
//! A sink receives already-formatted lines. It owns its output resource for
//! the rest of the process and serializes writes behind a mutex so lines from
//! different threads never interleave.

use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use super::level::{Level, Threshold};
use crate::error::{LogError, LogResult};

/// A destination for formatted log lines.
pub trait Sink: Send + Sync {
    /// Minimum level this sink accepts.
    fn threshold(&self) -> Threshold;

    /// Write one formatted record. The sink appends the line terminator.
    fn write_line(&self, line: &str) -> io::Result<()>;

    fn flush(&self) -> io::Result<()>;

    /// Backing file, if the sink writes to one.
    fn path(&self) -> Option<&Path> {
        None
    }

    fn accepts(&self, level: Level) -> bool {
        self.threshold().allows(level)
    }
}

/// Sink writing to standard output, or to any injected writer.
pub struct ConsoleSink {
    threshold: Threshold,
    out: Mutex<Box<dyn Write + Send>>,
}

impl ConsoleSink {
    /// Console sink on stdout.
    pub fn stdout(threshold: Threshold) -> Self {
        Self::with_writer(threshold, io::stdout())
    }

    /// Console sink on an arbitrary writer.
    pub fn with_writer(threshold: Threshold, out: impl Write + Send + 'static) -> Self {
        Self {
            threshold,
            out: Mutex::new(Box::new(out)),
        }
    }
}

impl fmt::Debug for ConsoleSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConsoleSink")
            .field("threshold", &self.threshold)
            .finish_non_exhaustive()
    }
}

impl Sink for ConsoleSink {
    fn threshold(&self) -> Threshold {
        self.threshold
    }

    fn write_line(&self, line: &str) -> io::Result<()> {
        let mut out = self.out.lock();
        writeln!(out, "{}", line)?;
        out.flush()
    }

    fn flush(&self) -> io::Result<()> {
        self.out.lock().flush()
    }
}

/// Sink appending to a file.
///
/// The file is opened in append mode, so separate processes writing the same
/// path each get whole-`write` appends, but no cross-process locking is done.
pub struct FileSink {
    threshold: Threshold,
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl FileSink {
    /// Open (or create) `path` for appending.
    pub fn open(path: impl Into<PathBuf>, threshold: Threshold) -> LogResult<Self> {
        let path = path.into();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| LogError::OpenSink {
                path: path.clone(),
                source,
            })?;

        tracing::debug!(path = %path.display(), "opened log file sink");

        Ok(Self {
            threshold,
            writer: Mutex::new(BufWriter::new(file)),
            path,
        })
    }
}

impl fmt::Debug for FileSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileSink")
            .field("threshold", &self.threshold)
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl Sink for FileSink {
    fn threshold(&self) -> Threshold {
        self.threshold
    }

    fn write_line(&self, line: &str) -> io::Result<()> {
        let mut writer = self.writer.lock();
        writeln!(writer, "{}", line)?;
        writer.flush()
    }

    fn flush(&self) -> io::Result<()> {
        self.writer.lock().flush()
    }

    fn path(&self) -> Option<&Path> {
        Some(&self.path)
    }
}

impl Drop for FileSink {
    fn drop(&mut self) {
        let _ = self.writer.get_mut().flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tempfile::TempDir;

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_console_sink_writes_lines() {
        let buf = SharedBuf::default();
        let sink = ConsoleSink::with_writer(Threshold::default(), buf.clone());

        sink.write_line("first").unwrap();
        sink.write_line("second").unwrap();

        let text = String::from_utf8(buf.0.lock().clone()).unwrap();
        assert_eq!(text, "first\nsecond\n");
        assert!(sink.path().is_none());
    }

    #[test]
    fn test_file_sink_appends() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("default.log");

        let sink = FileSink::open(&path, Threshold::default()).unwrap();
        sink.write_line("one").unwrap();
        drop(sink);

        let sink = FileSink::open(&path, Threshold::default()).unwrap();
        sink.write_line("two").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "one\ntwo\n");
        assert_eq!(sink.path(), Some(path.as_path()));
    }

    #[test]
    fn test_file_sink_open_failure_names_path() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("missing").join("default.log");

        let err = FileSink::open(&path, Threshold::default()).unwrap_err();
        match err {
            LogError::OpenSink { path: failed, .. } => assert_eq!(failed, path),
            other => panic!("expected OpenSink, got {:?}", other),
        }
    }

    #[test]
    fn test_sink_accepts_respects_threshold() {
        let sink = ConsoleSink::with_writer(Threshold::at_least(Level::Warning), io::sink());
        assert!(!sink.accepts(Level::Info));
        assert!(sink.accepts(Level::Error));
    }
}
