//! Single-entry text codec.
//!
//! ```text
//! 10.0.0.5 a.test b.test # dev        enabled, inline comment
//! # 10.0.0.5 a.test b.test            disabled
//! # dev                               comment of the disabled entry above
//! ```

use crate::address::is_valid_address;
use crate::entry::{Entry, EntryId};

/// Marker that starts a comment, both full-line and inline.
pub const COMMENT_MARKER: char = '#';

/// Decodes one trimmed line into an enabled entry.
///
/// For disabled-entry candidates the caller strips the leading `#` first.
/// Returns `None` when the line has fewer than two tokens before any inline
/// comment or when the first token is not an address, which is what tells a
/// disabled entry apart from a free-text comment.
#[must_use]
pub fn parse_line(line: &str, id: EntryId) -> Option<Entry> {
    let (mapping, comment) = match line.split_once(COMMENT_MARKER) {
        Some((mapping, comment)) => (mapping, Some(comment.trim())),
        None => (line, None),
    };

    let mut tokens = mapping.split_whitespace();
    let ip = tokens.next()?;
    if !is_valid_address(ip) {
        return None;
    }
    let hostnames: Vec<String> = tokens.map(str::to_string).collect();
    if hostnames.is_empty() {
        return None;
    }

    Some(Entry {
        id,
        ip: ip.to_string(),
        hostnames,
        enabled: true,
        comment: comment.filter(|c| !c.is_empty()).map(str::to_string),
        group: None,
    })
}

/// Encodes an entry as one line (enabled) or up to two comment lines
/// (disabled, with the comment on its own line).
#[must_use]
pub fn format_entry(entry: &Entry) -> Vec<String> {
    let mapping = format!("{} {}", entry.ip, entry.hostnames.join(" "));
    let comment = entry.comment.as_deref().filter(|c| !c.is_empty());

    match (entry.enabled, comment) {
        (true, Some(comment)) => vec![format!("{mapping} {COMMENT_MARKER} {comment}")],
        (true, None) => vec![mapping],
        (false, Some(comment)) => vec![
            format!("{COMMENT_MARKER} {mapping}"),
            format!("{COMMENT_MARKER} {comment}"),
        ],
        (false, None) => vec![format!("{COMMENT_MARKER} {mapping}")],
    }
}
