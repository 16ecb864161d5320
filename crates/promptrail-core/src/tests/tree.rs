use crate::*;

#[test]
fn index_maps_ids_to_positions_in_order() {
    let entries = vec![
        HistoryEntry::root("a"),
        HistoryEntry::child_of("b", "a"),
        HistoryEntry::child_of("c", "a"),
    ];
    let index = EntryIndex::from_entries(&entries);
    assert_eq!(index.len(), 3);
    assert_eq!(index.get("a"), Some(0));
    assert_eq!(index.get("b"), Some(1));
    assert_eq!(index.get("c"), Some(2));
}

#[test]
fn duplicate_ids_last_write_wins() {
    let entries = vec![
        HistoryEntry::root("a"),
        HistoryEntry::root("b"),
        HistoryEntry::child_of("a", "b"),
    ];
    let index = EntryIndex::from_entries(&entries);
    assert_eq!(index.len(), 2);
    assert_eq!(index.get("a"), Some(2));
}

#[test]
fn blank_ids_are_never_keyed() {
    let entries = vec![
        HistoryEntry::root(""),
        HistoryEntry::root("   "),
        HistoryEntry::root("a"),
    ];
    let index = EntryIndex::from_entries(&entries);
    assert_eq!(index.len(), 1);
    assert_eq!(index.get(""), None);
    assert_eq!(index.get("   "), None);
}

#[test]
fn resolve_parent_is_one_level_only() {
    let entries = vec![HistoryEntry::root("a"), HistoryEntry::child_of("b", "a")];
    let index = EntryIndex::from_entries(&entries);
    assert_eq!(index.resolve_parent(&entries[0]), None);
    assert_eq!(index.resolve_parent(&entries[1]), Some(0));
}

#[test]
fn resolve_parent_tolerates_dangling_references() {
    let entries = vec![HistoryEntry::child_of("b", "missing")];
    let index = EntryIndex::from_entries(&entries);
    assert_eq!(index.resolve_parent(&entries[0]), None);
}

#[test]
fn resolve_parent_terminates_on_cycles() {
    // a -> b -> a is a forest violation; lookup is one level deep, so each
    // entry still resolves exactly once.
    let entries = vec![
        HistoryEntry::child_of("a", "b"),
        HistoryEntry::child_of("b", "a"),
    ];
    let index = EntryIndex::from_entries(&entries);
    assert_eq!(index.resolve_parent(&entries[0]), Some(1));
    assert_eq!(index.resolve_parent(&entries[1]), Some(0));
}

#[test]
fn blank_parent_id_never_matches() {
    let entries = vec![HistoryEntry::root(""), HistoryEntry::child_of("b", "")];
    let index = EntryIndex::from_entries(&entries);
    assert_eq!(index.resolve_parent(&entries[1]), None);
}
