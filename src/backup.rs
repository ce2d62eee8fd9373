//! Timestamped entry snapshots on disk.
//!
//! Each backup is a JSON file `<id>.json` in the backup directory, where
//! the id is the UTC creation time (`20261016T120000123Z`). Backups keep
//! the `group` field, which the hosts file format cannot hold.

use crate::entry::Entry;
use crate::error::{HostsError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::ffi::OsStr;
use std::fmt;
use std::path::{Path, PathBuf};

const BACKUP_EXTENSION: &str = "json";

/// Identifier of a backup, also its file stem.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BackupId(String);

impl BackupId {
    /// Wraps an identifier string.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BackupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for BackupId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Summary of a stored backup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupInfo {
    /// Backup identifier.
    pub id: BackupId,
    /// When the backup was taken.
    pub created_at: DateTime<Utc>,
    /// Number of entries it holds.
    pub entry_count: usize,
}

#[derive(Debug, Serialize, Deserialize)]
struct BackupFile {
    created_at: DateTime<Utc>,
    entries: Vec<Entry>,
}

/// Directory of entry snapshots.
#[derive(Debug, Clone)]
pub struct BackupStore {
    dir: PathBuf,
}

impl BackupStore {
    /// Uses `dir` for backups; it is created on first write.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Returns the backup directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Persists `entries` as a new backup.
    ///
    /// # Errors
    ///
    /// Returns [`HostsError::Io`] if the directory or file cannot be
    /// written, or [`HostsError::Serialization`] if encoding fails.
    pub fn create(&self, entries: &[Entry]) -> Result<BackupInfo> {
        self.create_at(entries, Utc::now())
    }

    fn create_at(&self, entries: &[Entry], created_at: DateTime<Utc>) -> Result<BackupInfo> {
        std::fs::create_dir_all(&self.dir)?;

        let stamp = created_at.format("%Y%m%dT%H%M%S%3fZ").to_string();
        let mut id = BackupId::new(stamp.clone());
        let mut attempt = 1;
        while self.backup_path(&id).exists() {
            id = BackupId::new(format!("{stamp}-{attempt:02}"));
            attempt += 1;
        }

        let file = BackupFile {
            created_at,
            entries: entries.to_vec(),
        };
        let path = self.backup_path(&id);
        std::fs::write(&path, serde_json::to_string_pretty(&file)?)?;

        tracing::info!(
            id = %id,
            entries = entries.len(),
            path = %path.display(),
            "Created hosts backup"
        );
        Ok(BackupInfo {
            id,
            created_at,
            entry_count: entries.len(),
        })
    }

    /// Lists backups, newest first.
    ///
    /// Returns an empty vec if the directory does not exist. Files that
    /// cannot be decoded are skipped with a warning.
    ///
    /// # Errors
    ///
    /// Returns [`HostsError::Io`] if the directory cannot be read.
    pub fn list(&self) -> Result<Vec<BackupInfo>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let mut backups = Vec::new();
        for dir_entry in std::fs::read_dir(&self.dir)? {
            let path = dir_entry?.path();
            if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some(BACKUP_EXTENSION) {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            match read_backup(&path) {
                Ok(file) => backups.push(BackupInfo {
                    id: BackupId::from(stem),
                    created_at: file.created_at,
                    entry_count: file.entries.len(),
                }),
                Err(e) => tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "Skipping unreadable backup"
                ),
            }
        }

        backups.sort_by(|a, b| (b.created_at, &b.id).cmp(&(a.created_at, &a.id)));
        Ok(backups)
    }

    /// Loads the entries of a backup.
    ///
    /// # Errors
    ///
    /// Returns [`HostsError::BackupNotFound`] if no such backup exists,
    /// [`HostsError::Io`] or [`HostsError::Serialization`] if it cannot be
    /// read.
    pub fn load(&self, id: &BackupId) -> Result<Vec<Entry>> {
        let path = self.existing_path(id)?;
        Ok(read_backup(&path)?.entries)
    }

    /// Deletes a backup.
    ///
    /// # Errors
    ///
    /// Returns [`HostsError::BackupNotFound`] if no such backup exists, or
    /// [`HostsError::Io`] if removal fails.
    pub fn delete(&self, id: &BackupId) -> Result<()> {
        let path = self.existing_path(id)?;
        std::fs::remove_file(&path)?;
        tracing::info!(id = %id, "Deleted hosts backup");
        Ok(())
    }

    /// Deletes all but the newest `keep` backups, returning how many were
    /// removed. Individual removal failures are logged and skipped.
    ///
    /// # Errors
    ///
    /// Returns [`HostsError::Io`] if the directory cannot be read.
    pub fn prune(&self, keep: usize) -> Result<usize> {
        let mut removed = 0;
        for info in self.list()?.into_iter().skip(keep) {
            match std::fs::remove_file(self.backup_path(&info.id)) {
                Ok(()) => removed += 1,
                Err(e) => tracing::warn!(
                    id = %info.id,
                    error = %e,
                    "Failed to prune hosts backup"
                ),
            }
        }
        if removed > 0 {
            tracing::debug!(removed, keep, "Pruned hosts backups");
        }
        Ok(removed)
    }

    fn existing_path(&self, id: &BackupId) -> Result<PathBuf> {
        let path = self.backup_path(id);
        let plain_name = Path::new(id.as_str()).file_name() == Some(OsStr::new(id.as_str()));
        if !plain_name || !path.is_file() {
            return Err(HostsError::BackupNotFound { id: id.to_string() });
        }
        Ok(path)
    }

    fn backup_path(&self, id: &BackupId) -> PathBuf {
        self.dir.join(format!("{id}.{BACKUP_EXTENSION}"))
    }
}

fn read_backup(path: &Path) -> Result<BackupFile> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}
