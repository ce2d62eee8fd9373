//! Structural comparison of two entry lists.
//!
//! Identifiers are not stable across reloads, so entries are matched by
//! address plus hostname set. Duplicate keys are paired up in order.

use crate::entry::Entry;

/// Differences between a base list and another list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryDiff {
    /// Present only in the other list.
    pub added: Vec<Entry>,
    /// Present only in the base list.
    pub removed: Vec<Entry>,
    /// Same mapping with a different enabled flag, comment or group,
    /// as `(base, other)`.
    pub changed: Vec<(Entry, Entry)>,
}

impl EntryDiff {
    /// Returns `true` if both lists hold the same mappings.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.changed.is_empty()
    }
}

fn same_mapping(a: &Entry, b: &Entry) -> bool {
    a.ip == b.ip && a.sorted_hostnames() == b.sorted_hostnames()
}

/// Compares `base` (e.g. a backup) against `other` (e.g. the working list).
#[must_use]
pub fn diff(base: &[Entry], other: &[Entry]) -> EntryDiff {
    let mut unmatched: Vec<&Entry> = other.iter().collect();
    let mut result = EntryDiff::default();

    for entry in base {
        // Prefer an identical counterpart so duplicates pair up exactly.
        let position = unmatched
            .iter()
            .position(|o| o.same_content(entry))
            .or_else(|| unmatched.iter().position(|o| same_mapping(o, entry)));

        match position {
            Some(i) => {
                let counterpart = unmatched.remove(i);
                if !counterpart.same_content(entry) {
                    result.changed.push((entry.clone(), counterpart.clone()));
                }
            }
            None => result.removed.push(entry.clone()),
        }
    }

    result.added = unmatched.into_iter().cloned().collect();
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::EntryId;

    fn entry(id: u64, ip: &str, hostnames: &[&str]) -> Entry {
        Entry::new(EntryId::new(id), ip, hostnames.iter().copied())
    }

    #[test]
    fn identical_lists_have_no_diff() {
        let a = vec![entry(1, "1.1.1.1", &["x", "y"])];
        let b = vec![entry(7, "1.1.1.1", &["y", "x"])];
        assert!(diff(&a, &b).is_empty());
    }

    #[test]
    fn reports_added_removed_and_changed() {
        let base = vec![
            entry(1, "1.1.1.1", &["keep"]),
            entry(2, "2.2.2.2", &["gone"]),
            entry(3, "3.3.3.3", &["flip"]),
        ];
        let other = vec![
            entry(1, "1.1.1.1", &["keep"]),
            entry(3, "3.3.3.3", &["flip"]).with_enabled(false),
            entry(4, "4.4.4.4", &["new"]),
        ];
        let d = diff(&base, &other);
        assert_eq!(d.removed.len(), 1);
        assert_eq!(d.removed[0].ip, "2.2.2.2");
        assert_eq!(d.added.len(), 1);
        assert_eq!(d.added[0].ip, "4.4.4.4");
        assert_eq!(d.changed.len(), 1);
        assert!(d.changed[0].0.enabled);
        assert!(!d.changed[0].1.enabled);
    }

    #[test]
    fn duplicates_pair_up_exactly() {
        let base = vec![
            entry(1, "1.1.1.1", &["x"]).with_comment("a"),
            entry(2, "1.1.1.1", &["x"]).with_comment("b"),
        ];
        let other = vec![
            entry(1, "1.1.1.1", &["x"]).with_comment("b"),
            entry(2, "1.1.1.1", &["x"]).with_comment("a"),
        ];
        assert!(diff(&base, &other).is_empty());
    }

    #[test]
    fn hostname_change_is_add_plus_remove() {
        let d = diff(&[entry(1, "1.1.1.1", &["x"])], &[entry(1, "1.1.1.1", &["y"])]);
        assert_eq!((d.added.len(), d.removed.len(), d.changed.len()), (1, 1, 0));
    }
}
