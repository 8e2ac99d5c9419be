//! `tracing` Layer that forwards events to a named logger.
//!
//! Lets code instrumented with `tracing` macros end up in the same console
//! and per-process files as code using [`Logger`] directly.

use std::fmt::Write as FmtWrite;
use std::sync::Arc;

use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::Layer;

use super::level::Level;
use super::logger::Logger;
use super::record::LogRecord;
use crate::error::LogResult;

/// A tracing Layer writing every event through one [`Logger`].
pub struct DistlogLayer {
    logger: Arc<Logger>,
}

impl DistlogLayer {
    pub fn new(logger: Arc<Logger>) -> Self {
        Self { logger }
    }

    /// Layer on the process-wide registry's logger called `name`.
    pub fn from_global(name: &str) -> LogResult<Self> {
        Ok(Self::new(super::registry::init_logger(name)?))
    }

    pub fn logger(&self) -> &Arc<Logger> {
        &self.logger
    }
}

impl<S> Layer<S> for DistlogLayer
where
    S: Subscriber,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let level = Level::from(*metadata.level());
        if !self.logger.enabled(level) {
            return;
        }

        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);

        let record = LogRecord::new(
            self.logger.name(),
            level,
            metadata.file().unwrap_or_else(|| metadata.target()),
            metadata.line().unwrap_or(0),
            visitor.finish(),
        );

        // A failing sink must not panic inside the subscriber
        let _ = self.logger.emit(record);
    }
}

/// Collects the `message` field and renders the rest as ` key=value`.
#[derive(Default)]
struct MessageVisitor {
    message: String,
    fields: String,
}

impl MessageVisitor {
    fn finish(mut self) -> String {
        self.message.push_str(&self.fields);
        self.message
    }
}

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.message, "{:?}", value);
        } else {
            let _ = write!(self.fields, " {}={:?}", field.name(), value);
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message.push_str(value);
        } else {
            let _ = write!(self.fields, " {}={}", field.name(), value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::level::Threshold;
    use crate::logging::sink::{ConsoleSink, Sink};
    use parking_lot::Mutex;
    use std::io::{self, Write};
    use tracing_subscriber::prelude::*;

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
    fn test_layer_forwards_events() {
        let buf = SharedBuf::default();
        let logger = Arc::new(Logger::new("bridge", Threshold::at_least(Level::Info)));
        let sink: Arc<dyn Sink> = Arc::new(ConsoleSink::with_writer(Threshold::ALL, buf.clone()));
        logger.attach(sink);

        let subscriber = tracing_subscriber::registry().with(DistlogLayer::new(logger));
        tracing::subscriber::with_default(subscriber, || {
            tracing::debug!("filtered out");
            tracing::info!("Test message");
            tracing::warn!(count = 42, "Warning with field");
        });

        let content = String::from_utf8(buf.0.lock().clone()).unwrap();
        let lines: Vec<_> = content.lines().collect();

        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("INFO "));
        assert!(lines[0].contains("[layer.rs:"));
        assert!(lines[0].ends_with("Test message"));
        assert!(lines[1].starts_with("WARNING "));
        assert!(lines[1].ends_with("Warning with field count=42"));
    }

    struct FailingSink(Mutex<usize>);

    impl Sink for FailingSink {
        fn threshold(&self) -> Threshold {
            Threshold::ALL
        }

        fn write_line(&self, _line: &str) -> io::Result<()> {
            *self.0.lock() += 1;
            Err(io::Error::new(io::ErrorKind::Other, "disk full"))
        }

        fn flush(&self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_layer_swallows_sink_errors() {
        let failing = Arc::new(FailingSink(Mutex::new(0)));
        let logger = Arc::new(Logger::new("bridge", Threshold::ALL));
        logger.attach(failing.clone());

        let subscriber = tracing_subscriber::registry().with(DistlogLayer::new(logger));
        tracing::subscriber::with_default(subscriber, || {
            tracing::error!("lost");
            tracing::info!("also lost");
        });

        assert_eq!(*failing.0.lock(), 2);
    }
}
