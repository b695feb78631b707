//! Background writer for audit entries.
//!
//! Sanitization never waits on the audit file. Entries are sent over an
//! unbounded channel to a dedicated thread that appends them in arrival order.
//! Dropping the writer detaches the thread, which drains what is already queued
//! and exits; [`AuditWriter::shutdown`] does the same but waits for it.

use log::{debug, warn};
use std::io;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tokio::sync::mpsc;

use super::{AuditEntry, AuditLog};

const WRITER_THREAD_NAME: &str = "sanitizer-audit";

#[derive(Debug)]
pub struct AuditWriter {
    log: Arc<AuditLog>,
    tx: mpsc::UnboundedSender<AuditEntry>,
    handle: JoinHandle<()>,
}

impl AuditWriter {
    /// Starts the writer thread for `log`.
    pub fn spawn(log: AuditLog) -> io::Result<Self> {
        let log = Arc::new(log);
        let (tx, mut rx) = mpsc::unbounded_channel::<AuditEntry>();
        let thread_log = Arc::clone(&log);

        let handle = thread::Builder::new()
            .name(WRITER_THREAD_NAME.to_string())
            .spawn(move || {
                while let Some(entry) = rx.blocking_recv() {
                    if let Err(e) = thread_log.append(&entry) {
                        warn!("Dropping audit entry for '{}': {}", entry.source, e);
                    }
                }
                debug!("Audit writer channel closed; thread exiting.");
            })?;

        Ok(Self { log, tx, handle })
    }

    /// Queues `entry` for writing. Never blocks and never fails the caller.
    pub fn dispatch(&self, entry: AuditEntry) {
        if let Err(e) = self.tx.send(entry) {
            debug!("Audit writer is gone; entry for '{}' not recorded.", e.0.source);
        }
    }

    /// The log this writer appends to. Cleanup goes through it directly.
    pub fn log(&self) -> &AuditLog {
        &self.log
    }

    /// Closes the channel and waits until every queued entry is written.
    pub fn shutdown(self) {
        let Self { tx, handle, .. } = self;
        drop(tx);
        if handle.join().is_err() {
            warn!("Audit writer thread panicked during shutdown.");
        }
    }
}
