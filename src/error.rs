//! Error types.

use crate::entry::EntryId;
use std::fmt;
use thiserror::Error;

/// Result alias for hosts-editor operations.
pub type Result<T> = std::result::Result<T, HostsError>;

/// Errors returned by hosts-editor operations.
#[derive(Debug, Error)]
pub enum HostsError {
    /// Filesystem I/O failed (typically `PermissionDenied` on the hosts file).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// One or more entries failed validation; nothing was written.
    #[error("invalid entries: {}", join_issues(.0))]
    InvalidEntries(Vec<EntryIssue>),

    /// Refused to write a hosts file without any entries.
    #[error("refusing to write an empty hosts file")]
    EmptyWrite,

    /// No backup with the given identifier exists.
    #[error("backup not found: {id}")]
    BackupNotFound {
        /// The requested backup identifier.
        id: String,
    },

    /// No profile with the given name exists.
    #[error("profile not found: {name}")]
    ProfileNotFound {
        /// The requested profile name.
        name: String,
    },

    /// Profile names are used as file names and must stay simple.
    #[error("invalid profile name: {0:?}")]
    InvalidProfileName(String),

    /// A backup or profile file could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid configuration values.
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

impl HostsError {
    /// Returns `true` if the underlying I/O error is `PermissionDenied`.
    #[must_use]
    pub fn is_permission_denied(&self) -> bool {
        matches!(self, Self::Io(e) if e.kind() == std::io::ErrorKind::PermissionDenied)
    }
}

/// Validation failures for a single entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryIssue {
    /// Identifier of the offending entry.
    pub id: EntryId,
    /// The entry's address literal, for display.
    pub ip: String,
    /// Every reason the entry was rejected.
    pub reasons: Vec<String>,
}

impl fmt::Display for EntryIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ip = if self.ip.is_empty() { "<empty>" } else { &self.ip };
        write!(f, "entry {} ({ip}): {}", self.id, self.reasons.join(", "))
    }
}

fn join_issues(issues: &[EntryIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
