//! Whole-document parsing.
//!
//! Parsing is lenient: lines that are neither entries nor comments are
//! dropped silently so that hand-edited files always load.

use crate::codec::{COMMENT_MARKER, parse_line};
use crate::entry::{Entry, EntryId};
use std::time::SystemTime;

/// A parsed hosts file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Entries in file order.
    pub entries: Vec<Entry>,
    /// The untouched source lines.
    pub raw_lines: Vec<String>,
    /// Modification time of the backing file, when known.
    pub modified: Option<SystemTime>,
}

impl Document {
    /// Parses `text` without file metadata.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        Self::from_text(text, None)
    }

    /// Parses `text` read from a file last modified at `modified`.
    #[must_use]
    pub fn from_text(text: &str, modified: Option<SystemTime>) -> Self {
        Self {
            entries: parse(text),
            raw_lines: text.lines().map(str::to_string).collect(),
            modified,
        }
    }
}

/// Written by some Windows editors at the start of the file.
const BYTE_ORDER_MARK: char = '\u{feff}';

/// How one raw line was interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
enum LineKind {
    Blank,
    /// Active or disabled entry.
    Entry,
    /// Free-text comment, marker stripped and trimmed.
    Comment(String),
    /// Non-comment line that did not decode.
    Dropped,
}

/// Parses a full document into entries with sequential identifiers
/// starting at 1.
#[must_use]
pub fn parse(text: &str) -> Vec<Entry> {
    let text = text.strip_prefix(BYTE_ORDER_MARK).unwrap_or(text);
    let mut next_id = 1;
    let mut entries = Vec::new();
    let mut kinds = Vec::new();

    for raw in text.lines() {
        let line = raw.trim();
        let kind = if line.is_empty() {
            LineKind::Blank
        } else if let Some(rest) = line.strip_prefix(COMMENT_MARKER) {
            let rest = rest.trim();
            match parse_line(rest, EntryId::new(next_id)) {
                Some(entry) => {
                    entries.push(entry.with_enabled(false));
                    next_id += 1;
                    LineKind::Entry
                }
                None => LineKind::Comment(rest.to_string()),
            }
        } else {
            match parse_line(line, EntryId::new(next_id)) {
                Some(entry) => {
                    entries.push(entry);
                    next_id += 1;
                    LineKind::Entry
                }
                None => LineKind::Dropped,
            }
        };
        kinds.push((kind, entries.len()));
    }

    attach_comments(&mut entries, &kinds);
    tracing::debug!(
        lines = kinds.len(),
        entries = entries.len(),
        "Parsed hosts document"
    );
    entries
}

/// Attaches each free comment line to the entry appended just before it,
/// provided the comment directly follows a non-comment, non-blank line.
/// `kinds` pairs each line with the entry count after that line.
fn attach_comments(entries: &mut [Entry], kinds: &[(LineKind, usize)]) {
    for pair in kinds.windows(2) {
        let [(previous, _), (LineKind::Comment(text), appended)] = pair else {
            continue;
        };
        if matches!(previous, LineKind::Blank | LineKind::Comment(_)) || text.is_empty() {
            continue;
        }
        let Some(entry) = appended.checked_sub(1).and_then(|i| entries.get_mut(i)) else {
            continue;
        };
        if entry.comment.is_none() {
            entry.comment = Some(text.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
# Hosts file managed by hosts-editor
# Generated at 2026-01-01T00:00:00.000Z

127.0.0.1 localhost
::1 localhost ip6-localhost # loopback
# 10.0.0.5 a.test b.test
# dev
garbage here
192.168.1.1 router
";

    #[test]
    fn parses_entries_in_order_with_sequential_ids() {
        let entries = parse(SAMPLE);
        let ips: Vec<&str> = entries.iter().map(|e| e.ip.as_str()).collect();
        assert_eq!(ips, vec!["127.0.0.1", "::1", "10.0.0.5", "192.168.1.1"]);
        let ids: Vec<u64> = entries.iter().map(|e| e.id.get()).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
    }

    #[test]
    fn leading_byte_order_mark_is_ignored() {
        let entries = parse("\u{feff}127.0.0.1 localhost\n");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].ip, "127.0.0.1");
    }

    #[test]
    fn commented_mapping_is_disabled_entry() {
        let entries = parse(SAMPLE);
        assert!(!entries[2].enabled);
        assert_eq!(entries[2].hostnames, vec!["a.test", "b.test"]);
        assert_eq!(entries[2].comment.as_deref(), Some("dev"));
    }

    #[test]
    fn header_comments_are_discarded() {
        let entries = parse(SAMPLE);
        assert_eq!(entries[0].comment, None);
        assert_eq!(entries[1].comment.as_deref(), Some("loopback"));
    }

    #[test]
    fn malformed_lines_are_dropped() {
        assert!(parse("not valid line\n").is_empty());
        assert!(parse("999.1.1.1 host\n").is_empty());
        assert!(parse("").is_empty());
    }

    #[test]
    fn comment_after_entry_is_attached() {
        let entries = parse("10.0.0.1 web\n# primary web server\n");
        assert_eq!(entries[0].comment.as_deref(), Some("primary web server"));
    }

    #[test]
    fn comment_after_blank_line_is_not_attached() {
        let entries = parse("10.0.0.1 web\n\n# section header\n");
        assert_eq!(entries[0].comment, None);
    }

    #[test]
    fn second_comment_line_is_not_attached() {
        let entries = parse("10.0.0.1 web\n# first\n# second\n");
        assert_eq!(entries[0].comment.as_deref(), Some("first"));
    }

    #[test]
    fn inline_comment_wins_over_following_comment() {
        let entries = parse("10.0.0.1 web # inline\n# following\n");
        assert_eq!(entries[0].comment.as_deref(), Some("inline"));
    }

    #[test]
    fn comment_after_dropped_line_attaches_to_last_entry() {
        let entries = parse("10.0.0.1 web\nbroken line\n# note\n");
        assert_eq!(entries[0].comment.as_deref(), Some("note"));
    }

    #[test]
    fn comment_before_any_entry_is_discarded() {
        let entries = parse("broken line\n# note\n10.0.0.1 web\n");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].comment, None);
    }

    #[test]
    fn document_keeps_raw_lines() {
        let doc = Document::parse("127.0.0.1 localhost\r\n# hi\r\n");
        assert_eq!(doc.raw_lines, vec!["127.0.0.1 localhost", "# hi"]);
        assert_eq!(doc.entries.len(), 1);
        assert_eq!(doc.modified, None);
    }
}
