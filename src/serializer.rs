//! Whole-document serialization.

use crate::codec::format_entry;
use crate::entry::Entry;
use chrono::{DateTime, SecondsFormat, Utc};

/// Renders entries as hosts file text, stamped with the current time.
///
/// ```text
/// # Hosts file managed by <app_name>
/// # Generated at 2026-10-16T12:00:00.000Z
///
/// 127.0.0.1 localhost
/// ```
#[must_use]
pub fn stringify(entries: &[Entry], app_name: &str) -> String {
    stringify_at(entries, app_name, Utc::now())
}

/// Renders entries as hosts file text with an explicit header timestamp.
///
/// Entries without hostnames cannot be written as a mapping and are skipped
/// with a warning; validate first to reject them instead.
#[must_use]
pub fn stringify_at(entries: &[Entry], app_name: &str, generated_at: DateTime<Utc>) -> String {
    let mut lines = vec![
        format!("# Hosts file managed by {app_name}"),
        format!(
            "# Generated at {}",
            generated_at.to_rfc3339_opts(SecondsFormat::Millis, true)
        ),
        String::new(),
    ];

    for entry in entries {
        if entry.hostnames.is_empty() {
            tracing::warn!(id = %entry.id, ip = %entry.ip, "Skipping entry without hostnames");
            continue;
        }
        lines.extend(format_entry(entry));
    }

    let mut text = lines.join("\n");
    text.push('\n');
    text
}
