//! Write-time validation of entries.
//!
//! Parsing is lenient; writing is not. Every entry must carry a valid
//! address and at least one well-formed hostname before a hosts file is
//! produced from it.

use crate::address::is_valid_address;
use crate::codec::parse_line;
use crate::entry::Entry;
use crate::error::{EntryIssue, HostsError, Result};
use regex::Regex;
use std::sync::LazyLock;

// DNS label: alphanumeric and hyphens, 1-63 chars, no leading/trailing hyphen
static LABEL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9]([a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?$").unwrap());

/// RFC 1035 upper bound on a full host name.
const MAX_HOSTNAME_LEN: usize = 253;

/// Checks a host name, returning the reason it is invalid.
///
/// # Errors
///
/// Returns a human-readable reason when the name is empty, longer than 253
/// characters, or contains a malformed label.
pub fn validate_hostname(hostname: &str) -> std::result::Result<(), String> {
    if hostname.is_empty() {
        return Err("hostname cannot be empty".to_string());
    }
    if hostname.len() > MAX_HOSTNAME_LEN {
        return Err(format!(
            "hostname '{hostname}' exceeds maximum length of {MAX_HOSTNAME_LEN} characters"
        ));
    }
    if hostname.starts_with('.') || hostname.ends_with('.') {
        return Err(format!("hostname '{hostname}' cannot start or end with dot"));
    }
    for label in hostname.split('.') {
        if !LABEL_REGEX.is_match(label) {
            return Err(format!("invalid label '{label}' in hostname '{hostname}'"));
        }
    }
    Ok(())
}

/// Returns every reason `entry` cannot be written. Empty means valid.
#[must_use]
pub fn validate_entry(entry: &Entry) -> Vec<String> {
    let mut reasons = Vec::new();
    if !is_valid_address(&entry.ip) {
        reasons.push(format!("invalid IP address '{}'", entry.ip));
    }
    if entry.hostnames.is_empty() {
        reasons.push("no hostnames".to_string());
    }
    reasons.extend(
        entry
            .hostnames
            .iter()
            .filter_map(|name| validate_hostname(name).err()),
    );
    if let Some(comment) = entry.comment.as_deref() {
        if comment.contains(['\n', '\r']) {
            reasons.push("comment contains a line break".to_string());
        }
        if comment.trim() != comment || comment.is_empty() {
            reasons.push("comment has leading or trailing whitespace".to_string());
        }
        // A disabled entry's comment gets its own `# ...` line.
        if !entry.enabled && parse_line(comment, entry.id).is_some() {
            reasons.push(format!(
                "comment '{comment}' of a disabled entry would read back as another entry"
            ));
        }
    }
    reasons
}

/// Validates a full entry list before it is written.
///
/// # Errors
///
/// Returns [`HostsError::EmptyWrite`] for an empty list, or a single
/// [`HostsError::InvalidEntries`] enumerating every offending entry.
pub fn validate_entries(entries: &[Entry]) -> Result<()> {
    if entries.is_empty() {
        return Err(HostsError::EmptyWrite);
    }

    let issues: Vec<EntryIssue> = entries
        .iter()
        .filter_map(|entry| {
            let reasons = validate_entry(entry);
            (!reasons.is_empty()).then(|| EntryIssue {
                id: entry.id,
                ip: entry.ip.clone(),
                reasons,
            })
        })
        .collect();

    if issues.is_empty() {
        Ok(())
    } else {
        tracing::debug!(count = issues.len(), "Rejected entries during validation");
        Err(HostsError::InvalidEntries(issues))
    }
}
