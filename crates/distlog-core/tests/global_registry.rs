//! Process-wide registry test
//!
//! Kept in its own test binary because it configures the environment before
//! the global registry is first touched.

use std::sync::Arc;

use distlog_core::logging::{
    global, init_logger, DistlogLayer, Sink, LOG_DIR_ENV, LOG_LEVEL_ENV,
};
use distlog_core::Level;
use tempfile::TempDir;

#[test]
fn test_global_registry_initializes_once() {
    let temp = TempDir::new().unwrap();
    let log_dir = temp.path().join("run");
    std::env::set_var(LOG_DIR_ENV, &log_dir);
    std::env::set_var(LOG_LEVEL_ENV, "Debug");

    // Race first use from several threads
    let handles: Vec<_> = (0..8)
        .map(|i| std::thread::spawn(move || init_logger(&format!("rank-{}", i % 2)).unwrap()))
        .collect();
    let loggers: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    let registry = global().unwrap();
    assert!(std::ptr::eq(registry, global().unwrap()));
    assert_eq!(registry.config().log_dir.as_deref(), Some(log_dir.as_path()));
    assert_eq!(registry.config().threshold.min_level(), Some(Level::Debug));

    let pid = std::process::id();
    let sink: Arc<dyn Sink> = registry.process_sink(pid).unwrap();
    assert_eq!(registry.process_sink_count(), 1);
    for logger in &loggers {
        assert!(logger.has_sink(&sink));
        assert_eq!(logger.sinks().len(), 2);
    }

    let again = init_logger("rank-0").unwrap();
    assert!(Arc::ptr_eq(&again, &loggers[0]));

    let layer = DistlogLayer::from_global("rank-1").unwrap();
    assert!(Arc::ptr_eq(layer.logger(), &loggers[1]));
    assert_eq!(layer.logger().sinks().len(), 2);

    again.debug("visible at debug").unwrap();
    let content = std::fs::read_to_string(log_dir.join(format!("process.{}.log", pid))).unwrap();
    assert!(content.contains("visible at debug"));
    assert!(log_dir.join("default.log").exists());
}
