//! Append-only audit trail of sanitization activity.
//!
//! Every sanitizer with auditing enabled writes one JSON object per line to
//! `<audit_log_dir>/sanitizer-audit.log`. Retention is coarse: once the file's
//! last modification is older than the retention window, the whole file is
//! removed.
//!
//! License: MIT OR APACHE 2.0

use chrono::{DateTime, Utc};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, SystemTime};

use crate::errors::SanitizerError;

pub mod writer;

pub use writer::AuditWriter;

/// Name of the audit log file inside the audit directory.
pub const AUDIT_LOG_FILE_NAME: &str = "sanitizer-audit.log";

const SECONDS_PER_DAY: u64 = 24 * 60 * 60;

/// One line of the audit log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub timestamp: DateTime<Utc>,
    pub source: String,
    pub rules_applied: Vec<String>,
    pub match_count: usize,
}

/// Handle on the audit log file.
#[derive(Debug)]
pub struct AuditLog {
    path: PathBuf,
    // Serializes append and cleanup within this process; the advisory file
    // lock covers other processes sharing the directory.
    lock: Mutex<()>,
}

impl AuditLog {
    /// Ensures `dir` exists and binds to the audit file inside it.
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self, SanitizerError> {
        let dir = dir.as_ref();
        create_log_dir(dir).map_err(|source| SanitizerError::AuditSetup {
            dir: dir.to_path_buf(),
            source,
        })?;

        let path = dir.join(AUDIT_LOG_FILE_NAME);
        info!("Audit log bound to {}", path.display());
        Ok(Self { path, lock: Mutex::new(()) })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends `entry` as a single JSON line, creating the file if needed.
    pub fn append(&self, entry: &AuditEntry) -> Result<(), SanitizerError> {
        let mut line = serde_json::to_vec(entry)?;
        line.push(b'\n');

        let _guard = self.lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        fs2::FileExt::lock_exclusive(&file)?;
        let written = file.write_all(&line).and_then(|_| file.flush());
        fs2::FileExt::unlock(&file)?;
        written?;

        debug!(
            "Appended audit entry for '{}' ({} matches).",
            entry.source, entry.match_count
        );
        Ok(())
    }

    /// Deletes the audit log if it was last modified more than
    /// `retention_days` ago. `0` never deletes.
    pub fn cleanup(&self, retention_days: u32) -> Result<(), SanitizerError> {
        if retention_days == 0 {
            return Ok(());
        }

        let _guard = self.lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let modified = match fs::metadata(&self.path).and_then(|m| m.modified()) {
            Ok(modified) => modified,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
            Err(source) => return Err(self.cleanup_error(source)),
        };

        let window = Duration::from_secs(u64::from(retention_days) * SECONDS_PER_DAY);
        let cutoff = SystemTime::now().checked_sub(window).unwrap_or(SystemTime::UNIX_EPOCH);
        if modified >= cutoff {
            debug!("Audit log {} is within retention; keeping it.", self.path.display());
            return Ok(());
        }

        match fs::remove_file(&self.path) {
            Ok(()) => {
                info!(
                    "Removed audit log {} (older than {} days).",
                    self.path.display(),
                    retention_days
                );
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(self.cleanup_error(source)),
        }
    }

    fn cleanup_error(&self, source: io::Error) -> SanitizerError {
        SanitizerError::AuditCleanup { path: self.path.clone(), source }
    }
}

#[cfg(unix)]
fn create_log_dir(dir: &Path) -> io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;
    fs::DirBuilder::new().recursive(true).mode(0o755).create(dir)
}

#[cfg(not(unix))]
fn create_log_dir(dir: &Path) -> io::Result<()> {
    fs::create_dir_all(dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn entry(source: &str, count: usize) -> AuditEntry {
        AuditEntry {
            timestamp: Utc::now(),
            source: source.to_string(),
            rules_applied: vec!["aws-access-key".to_string()],
            match_count: count,
        }
    }

    fn age_file(path: &Path, days: u64) {
        let file = OpenOptions::new().write(true).open(path).unwrap();
        file.set_modified(SystemTime::now() - Duration::from_secs(days * SECONDS_PER_DAY))
            .unwrap();
    }

    #[test]
    fn test_open_creates_nested_directory() {
        let tmp = tempdir().unwrap();
        let dir = tmp.path().join("a").join("b");
        let log = AuditLog::open(&dir).unwrap();
        assert!(dir.is_dir());
        assert_eq!(log.path(), dir.join(AUDIT_LOG_FILE_NAME));
        assert!(!log.path().exists());
    }

    #[test]
    fn test_open_fails_when_path_is_a_file() {
        let tmp = tempdir().unwrap();
        let file = tmp.path().join("not-a-dir");
        fs::write(&file, "x").unwrap();
        assert!(matches!(AuditLog::open(&file), Err(SanitizerError::AuditSetup { .. })));
    }

    #[test]
    fn test_append_writes_one_json_line_per_entry() {
        let tmp = tempdir().unwrap();
        let log = AuditLog::open(tmp.path()).unwrap();
        log.append(&entry("first", 1)).unwrap();
        log.append(&entry("second", 2)).unwrap();

        let text = fs::read_to_string(log.path()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        let parsed: AuditEntry = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(parsed.source, "second");
        assert_eq!(parsed.match_count, 2);

        let raw: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        for field in ["timestamp", "source", "rules_applied", "match_count"] {
            assert!(raw.get(field).is_some(), "missing field {}", field);
        }
    }

    #[test]
    fn test_cleanup_zero_retention_never_deletes() {
        let tmp = tempdir().unwrap();
        let log = AuditLog::open(tmp.path()).unwrap();
        log.append(&entry("x", 1)).unwrap();
        age_file(log.path(), 365);
        log.cleanup(0).unwrap();
        assert!(log.path().exists());
    }

    #[test]
    fn test_cleanup_missing_file_is_ok() {
        let tmp = tempdir().unwrap();
        let log = AuditLog::open(tmp.path()).unwrap();
        log.cleanup(1).unwrap();
    }

    #[test]
    fn test_cleanup_removes_only_expired_file() {
        let tmp = tempdir().unwrap();
        let log = AuditLog::open(tmp.path()).unwrap();
        log.append(&entry("x", 1)).unwrap();

        log.cleanup(7).unwrap();
        assert!(log.path().exists());

        age_file(log.path(), 8);
        log.cleanup(7).unwrap();
        assert!(!log.path().exists());
    }
}
