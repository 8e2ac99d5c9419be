//! Line formatting with continuation-line alignment.
//!
//! Every record renders as
//!
//! ```text
//! LEVEL MM-DD HH:MM:SS [file:line] message
//! ```
//!
//! When the message spans several lines, each `\n` is replaced with `\r\n`
//! followed by the same prefix, so continuation lines line up under the
//! first line's message column and line-oriented consumers can still
//! attribute them to the same record.

use super::record::LogRecord;

/// Timestamp layout used in the line prefix.
pub const DATE_FORMAT: &str = "%m-%d %H:%M:%S";

/// The `LEVEL MM-DD HH:MM:SS [file:line] ` part of a record, trailing space included.
pub fn prefix(record: &LogRecord) -> String {
    format!(
        "{} {} [{}:{}] ",
        record.level,
        record.timestamp.format(DATE_FORMAT),
        record.filename(),
        record.line
    )
}

/// Render a record to a single output string (no trailing newline).
pub fn format_record(record: &LogRecord) -> String {
    let prefix = prefix(record);
    if record.message.is_empty() {
        return prefix;
    }

    let continuation = format!("\r\n{}", prefix);
    let mut out = String::with_capacity(prefix.len() + record.message.len());
    out.push_str(&prefix);
    out.push_str(&record.message.replace('\n', &continuation));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::level::Level;
    use chrono::NaiveDate;

    fn record(message: &str) -> LogRecord {
        let ts = NaiveDate::from_ymd_opt(2026, 3, 4)
            .unwrap()
            .and_hms_opt(5, 6, 7)
            .unwrap();
        LogRecord::new("solver", Level::Info, "src/solver/step.rs", 42, message).with_timestamp(ts)
    }

    #[test]
    fn test_single_line() {
        assert_eq!(
            format_record(&record("converged")),
            "INFO 03-04 05:06:07 [step.rs:42] converged"
        );
    }

    #[test]
    fn test_two_lines_aligned() {
        assert_eq!(
            format_record(&record("a\nb")),
            "INFO 03-04 05:06:07 [step.rs:42] a\r\nINFO 03-04 05:06:07 [step.rs:42] b"
        );
    }

    #[test]
    fn test_empty_message_is_bare_prefix() {
        assert_eq!(format_record(&record("")), "INFO 03-04 05:06:07 [step.rs:42] ");
    }

    #[test]
    fn test_trailing_newline_gets_prefix() {
        let out = format_record(&record("done\n"));
        assert!(out.ends_with("done\r\nINFO 03-04 05:06:07 [step.rs:42] "));
    }

    #[test]
    fn test_level_name_in_prefix() {
        let mut rec = record("x");
        rec.level = Level::Warning;
        assert!(prefix(&rec).starts_with("WARNING 03-04"));
    }
}
