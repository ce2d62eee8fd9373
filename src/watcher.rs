//! Polling detection of external hosts file changes.
//!
//! There is no portable change notification for the hosts file, so the
//! watcher re-reads it and compares against the last text it saw. Clones
//! share that baseline, so a write acknowledged through one clone is not
//! reported by a background thread polling another.

use crate::error::Result;
use crate::hosts_file::HostsFile;
use crate::parser::Document;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::JoinHandle;
use std::time::Duration;

/// Re-reads a hosts file and reports when its text changed.
#[derive(Debug, Clone)]
pub struct HostsWatcher {
    file: HostsFile,
    last_text: Arc<Mutex<Option<String>>>,
}

impl HostsWatcher {
    /// Watches `file`. The first [`poll`](Self::poll) reports the current
    /// contents unless a baseline is set with [`acknowledge`](Self::acknowledge).
    #[must_use]
    pub fn new(file: HostsFile) -> Self {
        Self {
            file,
            last_text: Arc::new(Mutex::new(None)),
        }
    }

    /// Records `text` as already seen, e.g. right after this process wrote it.
    pub fn acknowledge(&self, text: impl Into<String>) {
        *self.baseline() = Some(text.into());
    }

    /// Runs `write` with polling held off and, if it succeeds, records
    /// `text` as seen. No clone can observe the file between the write and
    /// the acknowledgement.
    ///
    /// # Errors
    ///
    /// Returns whatever `write` returns; the baseline is then unchanged.
    pub fn acknowledge_write<F>(&self, text: &str, write: F) -> Result<()>
    where
        F: FnOnce() -> Result<()>,
    {
        let mut baseline = self.baseline();
        write()?;
        *baseline = Some(text.to_string());
        Ok(())
    }

    /// Reads the file once; returns the parsed document if it changed.
    ///
    /// # Errors
    ///
    /// Returns [`HostsError::Io`](crate::HostsError::Io) if the file cannot
    /// be read. The baseline is left unchanged.
    pub fn poll(&self) -> Result<Option<Document>> {
        let mut baseline = self.baseline();
        let text = self.file.read_text()?;
        if baseline.as_deref() == Some(text.as_str()) {
            return Ok(None);
        }

        let document = Document::from_text(&text, self.file.modified());
        tracing::info!(
            path = %self.file.path().display(),
            entries = document.entries.len(),
            "Hosts file changed externally"
        );
        *baseline = Some(text);
        Ok(Some(document))
    }

    fn baseline(&self) -> MutexGuard<'_, Option<String>> {
        self.last_text.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Polls every `interval` on a background thread, delivering changed
    /// documents through the returned handle. Read failures are logged and
    /// polling continues.
    ///
    /// # Errors
    ///
    /// Returns [`HostsError::Io`](crate::HostsError::Io) if the thread
    /// cannot be spawned.
    pub fn spawn(self, interval: Duration) -> Result<WatchHandle> {
        let (doc_tx, doc_rx) = mpsc::channel();
        let (stop_tx, stop_rx) = mpsc::channel::<()>();

        let thread = std::thread::Builder::new()
            .name("hosts-watcher".into())
            .spawn(move || {
                loop {
                    match stop_rx.recv_timeout(interval) {
                        Err(RecvTimeoutError::Timeout) => {}
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }
                    match self.poll() {
                        Ok(Some(document)) => {
                            if doc_tx.send(document).is_err() {
                                break;
                            }
                        }
                        Ok(None) => {}
                        Err(e) => tracing::warn!(error = %e, "Failed to poll hosts file"),
                    }
                }
                tracing::debug!("Hosts watcher stopped");
            })?;

        Ok(WatchHandle {
            documents: doc_rx,
            stop: Some(stop_tx),
            thread: Some(thread),
        })
    }
}

/// Background watcher; stops and joins its thread on drop.
#[derive(Debug)]
pub struct WatchHandle {
    documents: Receiver<Document>,
    stop: Option<Sender<()>>,
    thread: Option<JoinHandle<()>>,
}

impl WatchHandle {
    /// Returns the next changed document, if one is waiting.
    #[must_use]
    pub fn try_recv(&self) -> Option<Document> {
        match self.documents.try_recv() {
            Ok(document) => Some(document),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    /// Blocks up to `timeout` for the next changed document.
    #[must_use]
    pub fn recv_timeout(&self, timeout: Duration) -> Option<Document> {
        self.documents.recv_timeout(timeout).ok()
    }
}

impl Drop for WatchHandle {
    fn drop(&mut self) {
        drop(self.stop.take());
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                tracing::warn!("Hosts watcher thread panicked");
            }
        }
    }
}
