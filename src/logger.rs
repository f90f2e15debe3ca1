//! Custom logging module.
//!
//! This module provides the `log` backend. The interactive session writes to
//! a log file since stderr would corrupt the alternate screen; the one-shot
//! commands write to stderr. Records from this crate pass at the configured
//! level, records from dependencies only at warn and above.

use crate::error::AppError;
use log::{Level, LevelFilter, Log, Metadata, Record};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

const CRATE_TARGET: &str = "todoist_tui";

/// Format a log record into a single line
///
pub fn format_log(record: &Record) -> String {
    let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
    let level_str = match record.level() {
        Level::Error => "ERROR",
        Level::Warn => "WARN",
        Level::Info => "INFO",
        Level::Debug => "DEBUG",
        Level::Trace => "TRACE",
    };
    format!(
        "{} {:5} [{}] {}",
        timestamp,
        level_str,
        record.target(),
        record.args()
    )
}

/// Where formatted records go.
///
pub enum LogSink {
    Stderr,
    File(Mutex<File>),
}

/// Level-filtered logger writing to a single sink
///
pub struct Logger {
    level: LevelFilter,
    sink: LogSink,
}

impl Logger {
    pub fn stderr(level: LevelFilter) -> Self {
        Logger {
            level,
            sink: LogSink::Stderr,
        }
    }

    /// Returns a logger appending to the file at the given path.
    ///
    pub fn file(path: &Path, level: LevelFilter) -> Result<Self, AppError> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Logger {
            level,
            sink: LogSink::File(Mutex::new(file)),
        })
    }

    /// Install as the global logger. Can only succeed once per process.
    ///
    pub fn init(self) -> Result<(), AppError> {
        let level = self.level;
        log::set_logger(Box::leak(Box::new(self)))
            .map_err(|e| AppError::Logger(e.to_string()))?;
        log::set_max_level(level);
        Ok(())
    }

    fn level_for(&self, target: &str) -> LevelFilter {
        let own = target == CRATE_TARGET || target.starts_with("todoist_tui::");
        if own {
            self.level
        } else {
            self.level.min(LevelFilter::Warn)
        }
    }
}

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level_for(metadata.target())
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format_log(record);
        match &self.sink {
            LogSink::Stderr => eprintln!("{}", line),
            LogSink::File(file) => {
                if let Ok(mut file) = file.lock() {
                    // Nowhere left to report a failed log write
                    let _ = writeln!(file, "{}", line);
                }
            }
        }
    }

    fn flush(&self) {
        if let LogSink::File(file) = &self.sink {
            if let Ok(mut file) = file.lock() {
                let _ = file.flush();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata(level: Level, target: &str) -> Metadata<'_> {
        Metadata::builder().level(level).target(target).build()
    }

    #[test]
    fn format_log_includes_level_target_and_message() {
        let line = format_log(
            &Record::builder()
                .args(format_args!("token exchanged"))
                .level(Level::Info)
                .target("todoist_tui::auth")
                .build(),
        );
        assert!(line.contains("INFO"));
        assert!(line.contains("[todoist_tui::auth]"));
        assert!(line.ends_with("token exchanged"));
    }

    #[test]
    fn own_records_follow_configured_level() {
        let logger = Logger::stderr(LevelFilter::Debug);
        assert!(logger.enabled(&metadata(Level::Debug, "todoist_tui::todoist")));
        assert!(!logger.enabled(&metadata(Level::Trace, "todoist_tui::todoist")));
        assert!(logger.enabled(&metadata(Level::Info, "todoist_tui")));
    }

    #[test]
    fn dependency_records_need_warn() {
        let logger = Logger::stderr(LevelFilter::Debug);
        assert!(!logger.enabled(&metadata(Level::Debug, "hyper::proto")));
        assert!(!logger.enabled(&metadata(Level::Info, "todoist_tuition")));
        assert!(logger.enabled(&metadata(Level::Warn, "reqwest")));

        let quiet = Logger::stderr(LevelFilter::Error);
        assert!(!quiet.enabled(&metadata(Level::Warn, "reqwest")));
    }

    #[test]
    fn file_sink_appends_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("todoist-tui.log");
        let logger = Logger::file(&path, LevelFilter::Info).unwrap();
        logger.log(
            &Record::builder()
                .args(format_args!("session started"))
                .level(Level::Info)
                .target("todoist_tui::app")
                .build(),
        );
        logger.log(
            &Record::builder()
                .args(format_args!("hidden"))
                .level(Level::Debug)
                .target("todoist_tui::app")
                .build(),
        );
        logger.flush();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("session started"));
        assert!(!contents.contains("hidden"));
        assert_eq!(contents.lines().count(), 1);
    }

    #[test]
    fn file_sink_reports_unopenable_path_as_io() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing").join("todoist-tui.log");
        let result = Logger::file(&missing, LevelFilter::Info);
        assert!(matches!(result, Err(AppError::Io(_))));
    }
}
