//! Property tests: serializing parsed entries and parsing them again yields
//! structurally equal entries.

use hosts_editor::{Entry, EntryId, parse, stringify};
use proptest::prelude::*;

fn ipv4_strategy() -> impl Strategy<Value = String> {
    (0u8..=255, 0u8..=255, 0u8..=255, 0u8..=255)
        .prop_map(|(a, b, c, d)| format!("{a}.{b}.{c}.{d}"))
}

fn ipv6_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(0u16..=0xffff, 8).prop_map(|groups| {
        groups
            .iter()
            .map(|g| format!("{g:x}"))
            .collect::<Vec<_>>()
            .join(":")
    })
}

fn entry_strategy() -> impl Strategy<Value = Entry> {
    (
        prop_oneof![ipv4_strategy(), ipv6_strategy(), Just("::1".to_string())],
        prop::collection::vec("[a-z][a-z0-9-]{0,10}[a-z0-9](\\.[a-z]{2,6})?", 1..4),
        any::<bool>(),
        prop::option::of("[A-Za-z0-9][A-Za-z0-9 ]{0,20}[A-Za-z0-9]"),
    )
        .prop_map(|(ip, hostnames, enabled, comment)| Entry {
            id: EntryId::new(0),
            ip,
            hostnames,
            enabled,
            comment,
            group: None,
        })
}

proptest! {
    #[test]
    fn stringify_then_parse_preserves_entries(entries in prop::collection::vec(entry_strategy(), 0..20)) {
        let parsed = parse(&stringify(&entries, "proptest"));
        prop_assert_eq!(parsed.len(), entries.len());
        for (before, after) in entries.iter().zip(&parsed) {
            prop_assert!(before.same_content(after), "{:?} != {:?}", before, after);
        }
    }

    #[test]
    fn parse_is_stable_after_one_cycle(entries in prop::collection::vec(entry_strategy(), 1..10)) {
        let first = parse(&stringify(&entries, "proptest"));
        let second = parse(&stringify(&first, "proptest"));
        prop_assert_eq!(first, second);
    }
}
