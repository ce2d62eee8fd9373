//! Change tracking over the working entry list.
//!
//! The store keeps two independent copies: `working`, which every edit
//! mutates, and `original`, the list as of the last load or save. An entry
//! is unsaved when it has no structurally equal counterpart (same id) in
//! `original`. After every mutation and every filter or sort change the
//! projection shown to the user is recomputed.

use crate::entry::{Entry, EntryId, EntryPatch, NewEntry};
use std::cmp::Ordering;
use std::str::FromStr;

/// Largest id kept as-is by [`HostsStore::load`] and [`HostsStore::restore`].
const MAX_KEPT_ID: u64 = u64::MAX / 2;

/// Status predicate of the projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    /// Every entry.
    #[default]
    All,
    /// Active mappings only.
    Enabled,
    /// Commented-out mappings only.
    Disabled,
    /// Entries that differ from the last saved state.
    Unsaved,
}

/// Field the projection is sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    /// Keep working-list order.
    #[default]
    None,
    /// Address literal, lexicographic.
    Ip,
    /// First hostname, lexicographic.
    Hostname,
    /// Group label, missing groups sort as `""`.
    Group,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Smallest first.
    #[default]
    Ascending,
    /// Largest first.
    Descending,
}

/// Returned when a filter or sort keyword is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown keyword: '{0}'")]
pub struct UnknownKeyword(pub String);

impl FromStr for StatusFilter {
    type Err = UnknownKeyword;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" | "" => Ok(Self::All),
            "enabled" => Ok(Self::Enabled),
            "disabled" => Ok(Self::Disabled),
            "unsaved" => Ok(Self::Unsaved),
            _ => Err(UnknownKeyword(s.to_string())),
        }
    }
}

impl FromStr for SortField {
    type Err = UnknownKeyword;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" | "" => Ok(Self::None),
            "ip" => Ok(Self::Ip),
            "hostname" => Ok(Self::Hostname),
            "group" => Ok(Self::Group),
            _ => Err(UnknownKeyword(s.to_string())),
        }
    }
}

impl FromStr for SortOrder {
    type Err = UnknownKeyword;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asc" | "ascending" | "" => Ok(Self::Ascending),
            "desc" | "descending" => Ok(Self::Descending),
            _ => Err(UnknownKeyword(s.to_string())),
        }
    }
}

/// Entry counts for a status bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StoreStats {
    /// Entries in the working list.
    pub total: usize,
    /// Active entries.
    pub enabled: usize,
    /// Commented-out entries.
    pub disabled: usize,
    /// Entries differing from the last saved state.
    pub unsaved: usize,
}

/// Working copy of the hosts entries with dirty tracking and a
/// filtered, sorted projection.
///
/// # Example
///
/// ```
/// use hosts_editor::{Entry, EntryId, HostsStore, NewEntry};
///
/// let mut store = HostsStore::new();
/// store.load(vec![Entry::new(EntryId::new(1), "127.0.0.1", ["localhost"])]);
/// assert!(!store.has_unsaved_changes());
///
/// let id = store.add(NewEntry::new("10.0.0.5", ["dev.test"]));
/// assert!(store.is_unsaved(store.get(id).unwrap()));
///
/// store.mark_saved();
/// assert!(!store.has_unsaved_changes());
/// ```
#[derive(Debug, Clone)]
pub struct HostsStore {
    working: Vec<Entry>,
    original: Vec<Entry>,
    next_id: u64,
    query: String,
    status: StatusFilter,
    sort_field: SortField,
    sort_order: SortOrder,
    /// Indices into `working`, in display order.
    projection: Vec<usize>,
}

impl HostsStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            working: Vec::new(),
            original: Vec::new(),
            next_id: 1,
            query: String::new(),
            status: StatusFilter::All,
            sort_field: SortField::None,
            sort_order: SortOrder::Ascending,
            projection: Vec::new(),
        }
    }

    /// Replaces both the working list and the saved baseline.
    pub fn load(&mut self, mut entries: Vec<Entry>) {
        self.reserve_ids(&mut entries);
        self.original.clone_from(&entries);
        self.working = entries;
        tracing::debug!(count = self.working.len(), "Loaded entries into store");
        self.recompute();
    }

    /// Records the working list as saved. Call only after a successful write.
    pub fn mark_saved(&mut self) {
        self.original.clone_from(&self.working);
        self.recompute();
    }

    /// Drops every unsaved edit.
    pub fn discard(&mut self) {
        self.working.clone_from(&self.original);
        self.recompute();
    }

    /// Replaces the working list (e.g. from a backup or profile) while
    /// keeping the saved baseline, so the differences show as unsaved.
    pub fn restore(&mut self, mut entries: Vec<Entry>) {
        self.reserve_ids(&mut entries);
        self.working = entries;
        self.recompute();
    }

    /// Appends a new entry and returns its freshly assigned identifier.
    pub fn add(&mut self, entry: NewEntry) -> EntryId {
        let id = EntryId::new(self.next_id);
        self.next_id += 1;
        self.working.push(entry.into_entry(id));
        self.recompute();
        id
    }

    /// Applies `patch` to the entry with `id`. Unknown ids are ignored.
    ///
    /// Returns whether an entry was updated.
    pub fn update(&mut self, id: EntryId, patch: EntryPatch) -> bool {
        let Some(entry) = self.working.iter_mut().find(|e| e.id == id) else {
            tracing::debug!(%id, "Update of unknown entry ignored");
            return false;
        };
        patch.apply(entry);
        self.recompute();
        true
    }

    /// Removes the entry with `id`, returning it.
    pub fn remove(&mut self, id: EntryId) -> Option<Entry> {
        let index = self.working.iter().position(|e| e.id == id)?;
        let removed = self.working.remove(index);
        self.recompute();
        Some(removed)
    }

    /// Flips the enabled flag of the entry with `id`. Unknown ids are ignored.
    ///
    /// Returns the new flag, or `None` if no such entry exists.
    pub fn toggle_enabled(&mut self, id: EntryId) -> Option<bool> {
        let entry = self.working.iter_mut().find(|e| e.id == id)?;
        entry.enabled = !entry.enabled;
        let enabled = entry.enabled;
        self.recompute();
        Some(enabled)
    }

    /// Returns `true` if `entry` is new or differs from its saved version.
    #[must_use]
    pub fn is_unsaved(&self, entry: &Entry) -> bool {
        self.original
            .iter()
            .find(|o| o.id == entry.id)
            .is_none_or(|o| !o.same_content(entry))
    }

    /// Returns `true` if anything was added, changed or removed since the
    /// last load or save.
    #[must_use]
    pub fn has_unsaved_changes(&self) -> bool {
        self.working.iter().any(|e| self.is_unsaved(e))
            || self
                .original
                .iter()
                .any(|o| !self.working.iter().any(|e| e.id == o.id))
    }

    /// Sets the search query; empty disables text filtering.
    pub fn set_filter(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.recompute();
    }

    /// Sets the status predicate.
    pub fn set_status(&mut self, status: StatusFilter) {
        self.status = status;
        self.recompute();
    }

    /// Sets the sort field and direction.
    pub fn set_sort(&mut self, field: SortField, order: SortOrder) {
        self.sort_field = field;
        self.sort_order = order;
        self.recompute();
    }

    /// The working list in edit order.
    #[must_use]
    pub fn entries(&self) -> &[Entry] {
        &self.working
    }

    /// The list as of the last load or save.
    #[must_use]
    pub fn original(&self) -> &[Entry] {
        &self.original
    }

    /// Looks up a working entry.
    #[must_use]
    pub fn get(&self, id: EntryId) -> Option<&Entry> {
        self.working.iter().find(|e| e.id == id)
    }

    /// The current projection: filtered and sorted working entries.
    #[must_use]
    pub fn visible(&self) -> Vec<&Entry> {
        self.projection.iter().map(|&i| &self.working[i]).collect()
    }

    /// Counts over the working list.
    #[must_use]
    pub fn stats(&self) -> StoreStats {
        let enabled = self.working.iter().filter(|e| e.enabled).count();
        StoreStats {
            total: self.working.len(),
            enabled,
            disabled: self.working.len() - enabled,
            unsaved: self.working.iter().filter(|e| self.is_unsaved(e)).count(),
        }
    }

    /// Advances `next_id` past every id in `entries`. Ids above
    /// [`MAX_KEPT_ID`] (only reachable through hand-edited JSON) are
    /// replaced with fresh ones so the counter cannot overflow.
    fn reserve_ids(&mut self, entries: &mut [Entry]) {
        let kept = entries.iter().map(|e| e.id.get()).filter(|&id| id <= MAX_KEPT_ID);
        if let Some(max) = kept.max() {
            self.next_id = self.next_id.max(max + 1);
        }
        for entry in entries.iter_mut().filter(|e| e.id.get() > MAX_KEPT_ID) {
            tracing::warn!(id = %entry.id, next = self.next_id, "Renumbering out-of-range entry id");
            entry.id = EntryId::new(self.next_id);
            self.next_id += 1;
        }
    }

    fn recompute(&mut self) {
        let query = self.query.to_lowercase();
        let mut projection: Vec<usize> = self
            .working
            .iter()
            .enumerate()
            .filter(|(_, e)| query.is_empty() || matches_query(e, &query))
            .filter(|(_, e)| self.matches_status(e))
            .map(|(i, _)| i)
            .collect();

        if self.sort_field != SortField::None {
            // Vec::sort_by is stable, so ties keep working-list order.
            projection.sort_by(|&a, &b| {
                let ordering = compare_by(self.sort_field, &self.working[a], &self.working[b]);
                match self.sort_order {
                    SortOrder::Ascending => ordering,
                    SortOrder::Descending => ordering.reverse(),
                }
            });
        }

        self.projection = projection;
    }

    fn matches_status(&self, entry: &Entry) -> bool {
        match self.status {
            StatusFilter::All => true,
            StatusFilter::Enabled => entry.enabled,
            StatusFilter::Disabled => !entry.enabled,
            StatusFilter::Unsaved => self.is_unsaved(entry),
        }
    }
}

impl Default for HostsStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Case-insensitive substring match; `query` is already lowercase.
fn matches_query(entry: &Entry, query: &str) -> bool {
    let hit = |text: &str| text.to_lowercase().contains(query);
    hit(&entry.ip)
        || entry.hostnames.iter().any(|h| hit(h))
        || entry.comment.as_deref().is_some_and(hit)
        || entry.group.as_deref().is_some_and(hit)
}

fn compare_by(field: SortField, a: &Entry, b: &Entry) -> Ordering {
    match field {
        SortField::None => Ordering::Equal,
        SortField::Ip => a.ip.cmp(&b.ip),
        SortField::Hostname => a.primary_hostname().cmp(b.primary_hostname()),
        SortField::Group => a
            .group
            .as_deref()
            .unwrap_or("")
            .cmp(b.group.as_deref().unwrap_or("")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: u64, ip: &str, hostnames: &[&str]) -> Entry {
        Entry::new(EntryId::new(id), ip, hostnames.iter().copied())
    }

    fn loaded(entries: Vec<Entry>) -> HostsStore {
        let mut store = HostsStore::new();
        store.load(entries);
        store
    }

    fn visible_ips(store: &HostsStore) -> Vec<String> {
        store.visible().iter().map(|e| e.ip.clone()).collect()
    }

    #[test]
    fn unsaved_compares_hostnames_as_sets() {
        let store = loaded(vec![entry(1, "1.1.1.1", &["x", "y"])]);
        assert!(!store.is_unsaved(&entry(1, "1.1.1.1", &["x", "y"])));
        assert!(!store.is_unsaved(&entry(1, "1.1.1.1", &["y", "x"])));
        assert!(store.is_unsaved(&entry(1, "1.1.1.1", &["x"])));
        assert!(store.is_unsaved(&entry(2, "1.1.1.1", &["x", "y"])));
    }

    #[test]
    fn unsaved_detects_added_hostname() {
        let store = loaded(vec![entry(1, "1.1.1.1", &["x"])]);
        assert!(!store.is_unsaved(&entry(1, "1.1.1.1", &["x"])));
        assert!(store.is_unsaved(&entry(1, "1.1.1.1", &["x", "y"])));
    }

    #[test]
    fn edits_touch_working_only() {
        let mut store = loaded(vec![entry(1, "1.1.1.1", &["x"])]);
        let id = EntryId::new(1);
        assert!(store.update(
            id,
            EntryPatch {
                comment: Some(Some("edited".into())),
                ..EntryPatch::default()
            }
        ));
        assert_eq!(store.original()[0].comment, None);
        assert!(store.is_unsaved(store.get(id).unwrap()));

        store.discard();
        assert_eq!(store.get(id).unwrap().comment, None);
        assert!(!store.has_unsaved_changes());
    }

    #[test]
    fn unknown_ids_are_no_ops() {
        let mut store = loaded(vec![entry(1, "1.1.1.1", &["x"])]);
        let missing = EntryId::new(42);
        assert!(!store.update(missing, EntryPatch::default()));
        assert_eq!(store.toggle_enabled(missing), None);
        assert!(store.remove(missing).is_none());
        assert!(!store.has_unsaved_changes());
    }

    #[test]
    fn toggle_marks_unsaved_and_back() {
        let mut store = loaded(vec![entry(1, "1.1.1.1", &["x"])]);
        let id = EntryId::new(1);
        assert_eq!(store.toggle_enabled(id), Some(false));
        assert!(store.has_unsaved_changes());
        assert_eq!(store.toggle_enabled(id), Some(true));
        assert!(!store.has_unsaved_changes());
    }

    #[test]
    fn removal_counts_as_unsaved_change() {
        let mut store = loaded(vec![entry(1, "1.1.1.1", &["x"]), entry(2, "2.2.2.2", &["y"])]);
        store.remove(EntryId::new(2));
        assert!(store.has_unsaved_changes());
        assert_eq!(store.stats().unsaved, 0);
    }

    #[test]
    fn added_ids_are_never_reused() {
        let mut store = loaded(vec![entry(5, "1.1.1.1", &["x"])]);
        let a = store.add(NewEntry::new("2.2.2.2", ["a"]));
        store.remove(a);
        let b = store.add(NewEntry::new("3.3.3.3", ["b"]));
        assert_eq!(a.get(), 6);
        assert_eq!(b.get(), 7);

        store.discard();
        let c = store.add(NewEntry::new("4.4.4.4", ["c"]));
        assert_eq!(c.get(), 8);
    }

    #[test]
    fn mark_saved_is_idempotent() {
        let mut store = loaded(vec![entry(1, "1.1.1.1", &["x"])]);
        store.add(NewEntry::new("2.2.2.2", ["y"]));
        store.mark_saved();
        assert!(store.entries().iter().all(|e| !store.is_unsaved(e)));
        store.mark_saved();
        assert!(store.entries().iter().all(|e| !store.is_unsaved(e)));
    }

    #[test]
    fn restore_keeps_baseline() {
        let mut store = loaded(vec![entry(1, "1.1.1.1", &["x"])]);
        store.restore(vec![entry(1, "1.1.1.1", &["x"]), entry(9, "9.9.9.9", &["nine"])]);
        assert_eq!(store.stats().unsaved, 1);
        assert_eq!(store.add(NewEntry::new("2.2.2.2", ["y"])).get(), 10);
    }

    #[test]
    fn restore_renumbers_out_of_range_ids() {
        let mut store = loaded(vec![entry(1, "1.1.1.1", &["x"])]);
        store.restore(vec![entry(1, "1.1.1.1", &["x"]), entry(u64::MAX, "9.9.9.9", &["nine"])]);

        let ids: Vec<u64> = store.entries().iter().map(|e| e.id.get()).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(store.add(NewEntry::new("2.2.2.2", ["y"])).get(), 3);
    }

    #[test]
    fn unknown_keyword_message() {
        let err = "sideways".parse::<SortOrder>().unwrap_err();
        assert_eq!(err.to_string(), "unknown keyword: 'sideways'");
    }

    #[test]
    fn sorts_by_ip_both_directions() {
        let mut store = loaded(vec![
            entry(1, "3.3.3.3", &["c"]),
            entry(2, "1.1.1.1", &["a"]),
            entry(3, "2.2.2.2", &["b"]),
        ]);
        store.set_filter("");
        store.set_sort(SortField::Ip, SortOrder::Ascending);
        assert_eq!(visible_ips(&store), vec!["1.1.1.1", "2.2.2.2", "3.3.3.3"]);
        store.set_sort(SortField::Ip, SortOrder::Descending);
        assert_eq!(visible_ips(&store), vec!["3.3.3.3", "2.2.2.2", "1.1.1.1"]);
        store.set_sort(SortField::None, SortOrder::Ascending);
        assert_eq!(visible_ips(&store), vec!["3.3.3.3", "1.1.1.1", "2.2.2.2"]);
    }

    #[test]
    fn group_sort_is_stable_and_treats_missing_as_empty() {
        let mut store = loaded(vec![
            entry(1, "1.1.1.1", &["a"]).with_group("b"),
            entry(2, "2.2.2.2", &["b"]),
            entry(3, "3.3.3.3", &["c"]).with_group("a"),
            entry(4, "4.4.4.4", &["d"]),
        ]);
        store.set_sort(SortField::Group, SortOrder::Ascending);
        assert_eq!(visible_ips(&store), vec!["2.2.2.2", "4.4.4.4", "3.3.3.3", "1.1.1.1"]);
    }

    #[test]
    fn hostname_sort_uses_first_name() {
        let mut store = loaded(vec![
            entry(1, "1.1.1.1", &["zeta", "alpha"]),
            entry(2, "2.2.2.2", &["beta"]),
        ]);
        store.set_sort(SortField::Hostname, SortOrder::Ascending);
        assert_eq!(visible_ips(&store), vec!["2.2.2.2", "1.1.1.1"]);
    }

    #[test]
    fn filter_is_case_insensitive_across_fields() {
        let mut store = loaded(vec![
            entry(1, "10.0.0.1", &["Web.Local"]),
            entry(2, "10.0.0.2", &["db"]).with_comment("Primary DB"),
            entry(3, "192.168.1.1", &["router"]).with_group("Network"),
        ]);
        store.set_filter("web");
        assert_eq!(visible_ips(&store), vec!["10.0.0.1"]);
        store.set_filter("primary");
        assert_eq!(visible_ips(&store), vec!["10.0.0.2"]);
        store.set_filter("NETWORK");
        assert_eq!(visible_ips(&store), vec!["192.168.1.1"]);
        store.set_filter("10.0.0");
        assert_eq!(visible_ips(&store), vec!["10.0.0.1", "10.0.0.2"]);
    }

    #[test]
    fn status_filter_composes_with_query() {
        let mut store = loaded(vec![
            entry(1, "10.0.0.1", &["web"]),
            entry(2, "10.0.0.2", &["web2"]).with_enabled(false),
        ]);
        store.add(NewEntry::new("10.0.0.3", ["web3"]));
        store.set_filter("web");

        store.set_status(StatusFilter::Disabled);
        assert_eq!(visible_ips(&store), vec!["10.0.0.2"]);
        store.set_status(StatusFilter::Unsaved);
        assert_eq!(visible_ips(&store), vec!["10.0.0.3"]);
        store.set_status(StatusFilter::Enabled);
        assert_eq!(visible_ips(&store), vec!["10.0.0.1", "10.0.0.3"]);
    }

    #[test]
    fn projection_follows_mutations() {
        let mut store = loaded(vec![entry(1, "1.1.1.1", &["x"])]);
        store.set_status(StatusFilter::Enabled);
        store.toggle_enabled(EntryId::new(1));
        assert!(store.visible().is_empty());
    }

    #[test]
    fn keywords_parse() {
        assert_eq!("Unsaved".parse::<StatusFilter>(), Ok(StatusFilter::Unsaved));
        assert_eq!("hostname".parse::<SortField>(), Ok(SortField::Hostname));
        assert_eq!("desc".parse::<SortOrder>(), Ok(SortOrder::Descending));
        assert!("sideways".parse::<SortOrder>().is_err());
    }

    #[test]
    fn stats_count_entries() {
        let mut store = loaded(vec![
            entry(1, "1.1.1.1", &["x"]),
            entry(2, "2.2.2.2", &["y"]).with_enabled(false),
        ]);
        store.add(NewEntry::new("3.3.3.3", ["z"]));
        assert_eq!(
            store.stats(),
            StoreStats {
                total: 3,
                enabled: 2,
                disabled: 1,
                unsaved: 1,
            }
        );
    }
}
