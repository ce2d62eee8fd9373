//! Hosts entry model.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier of an [`Entry`], unique within one entry list.
///
/// Identifiers are assigned when a document is parsed or an entry is
/// created, and are never reused by the same store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(u64);

impl EntryId {
    /// Wraps a raw identifier.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw identifier.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One line of the hosts table: an address mapped to one or more names.
///
/// A disabled entry is written as a comment but still parses back as an
/// entry. `group` only exists in memory (and in backups/profiles); it is
/// never written to the hosts file.
///
/// # Example
///
/// ```
/// use hosts_editor::{Entry, EntryId};
///
/// let entry = Entry::new(EntryId::new(1), "127.0.0.1", ["localhost"])
///     .with_comment("loopback");
///
/// assert!(entry.enabled);
/// assert_eq!(entry.comment.as_deref(), Some("loopback"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Stable identifier.
    pub id: EntryId,
    /// Address literal, preserved exactly as written.
    pub ip: String,
    /// Host names in file order.
    pub hostnames: Vec<String>,
    /// `false` when the mapping is commented out.
    pub enabled: bool,
    /// Trailing annotation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// Free-form organisational label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
}

impl Entry {
    /// Creates an enabled entry without comment or group.
    #[must_use]
    pub fn new<I, S>(id: EntryId, ip: impl Into<String>, hostnames: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id,
            ip: ip.into(),
            hostnames: hostnames.into_iter().map(Into::into).collect(),
            enabled: true,
            comment: None,
            group: None,
        }
    }

    /// Sets the enabled flag.
    #[must_use]
    pub const fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Sets the trailing comment. Surrounding whitespace is trimmed and a
    /// blank comment clears it, matching what the text format reads back.
    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = clean_comment(Some(comment.into()));
        self
    }

    /// Sets the group label.
    #[must_use]
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    /// Compares everything but the identifier. Hostnames are compared as a
    /// set (sorted, case-sensitive), so reordering names is not a change.
    #[must_use]
    pub fn same_content(&self, other: &Self) -> bool {
        self.ip == other.ip
            && self.enabled == other.enabled
            && self.comment == other.comment
            && self.group == other.group
            && self.sorted_hostnames() == other.sorted_hostnames()
    }

    /// Hostnames sorted for order-independent comparison.
    #[must_use]
    pub fn sorted_hostnames(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.hostnames.iter().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// First hostname, or `""` when there is none.
    #[must_use]
    pub fn primary_hostname(&self) -> &str {
        self.hostnames.first().map_or("", String::as_str)
    }
}

/// An entry that has not been assigned an identifier yet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEntry {
    /// Address literal.
    pub ip: String,
    /// Host names in order.
    pub hostnames: Vec<String>,
    /// Whether the mapping is active.
    pub enabled: bool,
    /// Trailing annotation.
    pub comment: Option<String>,
    /// Organisational label.
    pub group: Option<String>,
}

impl NewEntry {
    /// Creates an enabled entry draft.
    #[must_use]
    pub fn new<I, S>(ip: impl Into<String>, hostnames: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            ip: ip.into(),
            hostnames: hostnames.into_iter().map(Into::into).collect(),
            enabled: true,
            comment: None,
            group: None,
        }
    }

    /// Attaches an identifier.
    #[must_use]
    pub fn into_entry(self, id: EntryId) -> Entry {
        Entry {
            id,
            ip: self.ip,
            hostnames: self.hostnames,
            enabled: self.enabled,
            comment: clean_comment(self.comment),
            group: self.group,
        }
    }
}

/// Partial update applied by [`HostsStore::update`](crate::HostsStore::update).
///
/// `None` leaves a field untouched. `comment` and `group` are doubly
/// optional so they can be cleared with `Some(None)`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryPatch {
    /// New address literal.
    pub ip: Option<String>,
    /// Replacement host names.
    pub hostnames: Option<Vec<String>>,
    /// New enabled flag.
    pub enabled: Option<bool>,
    /// New comment, or `Some(None)` to clear it.
    pub comment: Option<Option<String>>,
    /// New group, or `Some(None)` to clear it.
    pub group: Option<Option<String>>,
}

impl EntryPatch {
    /// Applies every present field to `entry`.
    pub fn apply(self, entry: &mut Entry) {
        if let Some(ip) = self.ip {
            entry.ip = ip;
        }
        if let Some(hostnames) = self.hostnames {
            entry.hostnames = hostnames;
        }
        if let Some(enabled) = self.enabled {
            entry.enabled = enabled;
        }
        if let Some(comment) = self.comment {
            entry.comment = clean_comment(comment);
        }
        if let Some(group) = self.group {
            entry.group = group;
        }
    }
}

/// Trims a comment; blank comments become `None`.
fn clean_comment(comment: Option<String>) -> Option<String> {
    comment
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
}
