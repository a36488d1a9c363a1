use std::fs::File;
use std::io::Write;
use std::path::Path;

use chrono::Local;

/// Plugin session log.
///
/// Writes are best effort: a sink that cannot accept a line drops it
/// silently, so logging can never abort an event handler.
pub trait SessionLog {
    fn write_line(&self, line: &str);
}

/// Session log backed by a plain-text file, one line per entry.
///
/// The file is truncated when the log is opened, a version header is
/// written first, and each line is prefixed with the local wall-clock
/// time. The file stays open for the life of the log and is closed at
/// process teardown.
pub struct FileSessionLog {
    file: File,
}

impl FileSessionLog {
    pub fn create(path: &Path) -> std::io::Result<Self> {
        let file = File::create(path)?;
        let log = Self { file };
        log.write_line(concat!("city-date-sync v", env!("CARGO_PKG_VERSION")));
        Ok(log)
    }
}

impl SessionLog for FileSessionLog {
    fn write_line(&self, line: &str) {
        let timestamp = Local::now().format("%H:%M:%S");
        let _ = writeln!(&self.file, "{timestamp} {line}");
    }
}

/// Sink for sessions that run without a log file.
pub struct NullSessionLog;

impl SessionLog for NullSessionLog {
    fn write_line(&self, _line: &str) {}
}
