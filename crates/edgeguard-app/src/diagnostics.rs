//! Append-only diagnostic log port.

use camino::{Utf8Path, Utf8PathBuf};
use std::io::Write;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

/// Side-effecting sink for audit diagnostics. Implementations must never fail the audit.
pub trait DiagnosticLog {
    fn record(&self, message: &str);
}

/// Discards everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullDiagnosticLog;

impl DiagnosticLog for NullDiagnosticLog {
    fn record(&self, _message: &str) {}
}

/// Appends timestamped lines to a file. Write errors are swallowed.
#[derive(Clone, Debug)]
pub struct FileDiagnosticLog {
    path: Utf8PathBuf,
}

impl FileDiagnosticLog {
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Utf8Path {
        &self.path
    }
}

impl DiagnosticLog for FileDiagnosticLog {
    fn record(&self, message: &str) {
        let stamp = OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .unwrap_or_default();
        let result = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .and_then(|mut f| writeln!(f, "{stamp} {message}"));
        if let Err(err) = result {
            tracing::debug!(path = %self.path, error = %err, "diagnostic log write failed");
        }
    }
}

/// Pick the log for a resolved `debug_log` setting. Relative paths are resolved
/// against the project root.
pub fn diagnostic_log_for(project_root: &Utf8Path, debug_log: Option<&str>) -> Box<dyn DiagnosticLog> {
    match debug_log.map(str::trim).filter(|p| !p.is_empty()) {
        Some(path) => {
            let path = Utf8Path::new(path);
            let path = if path.is_absolute() {
                path.to_path_buf()
            } else {
                project_root.join(path)
            };
            Box::new(FileDiagnosticLog::new(path))
        }
        None => Box::new(NullDiagnosticLog),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn utf8_root(tmp: &TempDir) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("utf8 path")
    }

    #[test]
    fn file_log_appends_lines() {
        let tmp = TempDir::new().expect("temp dir");
        let log = FileDiagnosticLog::new(utf8_root(&tmp).join("audit.log"));
        log.record("first");
        log.record("second");

        let text = std::fs::read_to_string(log.path()).expect("read log");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with(" first"));
        assert!(lines[1].ends_with(" second"));
    }

    #[test]
    fn unwritable_log_is_silent() {
        let tmp = TempDir::new().expect("temp dir");
        let log = FileDiagnosticLog::new(utf8_root(&tmp).join("missing-dir").join("audit.log"));
        log.record("dropped");
        assert!(!log.path().exists());
    }

    #[test]
    fn relative_debug_log_lands_in_project() {
        let tmp = TempDir::new().expect("temp dir");
        let root = utf8_root(&tmp);
        let log = diagnostic_log_for(&root, Some("edgeguard.log"));
        log.record("hello");
        assert!(root.join("edgeguard.log").is_file());

        let none = diagnostic_log_for(&root, Some("  "));
        none.record("nowhere");
    }
}
