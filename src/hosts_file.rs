//! Reading and atomically rewriting the hosts file.
//!
//! Writing the system hosts file requires elevated privileges. The caller is
//! responsible for obtaining them (`sudo`, a helper process, UAC, etc.); this
//! module only reports the permission failure.

use crate::error::Result;
use crate::parser::Document;
use crate::util::{default_hosts_path, is_elevated};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Handle on a hosts file path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostsFile {
    path: PathBuf,
}

impl HostsFile {
    /// Targets the platform's system hosts file.
    #[must_use]
    pub fn new() -> Self {
        Self {
            path: default_hosts_path(),
        }
    }

    /// Targets a custom path (useful for testing).
    #[must_use]
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the hosts file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the raw text. Bytes that are not UTF-8 (a Latin-1 comment in
    /// a hand-edited file) become U+FFFD instead of failing the read.
    ///
    /// # Errors
    ///
    /// Returns [`HostsError::Io`](crate::HostsError::Io) if the file cannot
    /// be read.
    pub fn read_text(&self) -> Result<String> {
        let bytes = std::fs::read(&self.path)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Reads and parses the file, recording its modification time.
    ///
    /// # Errors
    ///
    /// Returns [`HostsError::Io`](crate::HostsError::Io) if the file cannot
    /// be read.
    pub fn read(&self) -> Result<Document> {
        let text = self.read_text()?;
        let document = Document::from_text(&text, self.modified());
        tracing::debug!(
            path = %self.path.display(),
            entries = document.entries.len(),
            "Read hosts file"
        );
        Ok(document)
    }

    /// Modification time of the file, if it exists and the platform
    /// reports one.
    #[must_use]
    pub fn modified(&self) -> Option<SystemTime> {
        std::fs::metadata(&self.path).and_then(|m| m.modified()).ok()
    }

    /// Replaces the file contents atomically.
    ///
    /// The text is written to a temporary file next to the target, synced,
    /// given the target's current permissions, and renamed over it. Readers
    /// never observe a partially written hosts file.
    ///
    /// # Errors
    ///
    /// Returns [`HostsError::Io`](crate::HostsError::Io) on failure,
    /// typically `PermissionDenied` when the process is not elevated.
    pub fn write(&self, text: &str) -> Result<()> {
        self.write_atomic(text).inspect_err(|e| {
            if e.kind() == std::io::ErrorKind::PermissionDenied {
                tracing::warn!(
                    path = %self.path.display(),
                    elevated = is_elevated(),
                    "Permission denied writing hosts file"
                );
            }
        })?;

        tracing::info!(
            path = %self.path.display(),
            bytes = text.len(),
            "Wrote hosts file"
        );
        Ok(())
    }

    fn write_atomic(&self, text: &str) -> std::io::Result<()> {
        // Replace the file a symlink points at, not the link itself.
        let target = std::fs::canonicalize(&self.path).unwrap_or_else(|_| self.path.clone());
        let dir = match target.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(text.as_bytes())?;
        tmp.as_file().sync_all()?;

        if let Ok(metadata) = std::fs::metadata(&target) {
            std::fs::set_permissions(tmp.path(), metadata.permissions())?;
        }

        tmp.persist(&target).map_err(|e| e.error)?;
        Ok(())
    }
}

impl Default for HostsFile {
    fn default() -> Self {
        Self::new()
    }
}
