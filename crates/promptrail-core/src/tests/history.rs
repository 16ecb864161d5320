use crate::*;

#[test]
fn session_initialize_replaces_entries() {
    let mut session = HistorySession::new();
    session.initialize(vec![HistoryEntry::root("a"), HistoryEntry::child_of("b", "a")]);
    assert_eq!(session.len(), 2);

    session.initialize(vec![HistoryEntry::root("c")]);
    assert_eq!(session.len(), 1);
    assert_eq!(session.entries()[0].id, "c");
}

#[test]
fn session_append_preserves_order() {
    let mut session = HistorySession::new();
    session.append(HistoryEntry::root("a"));
    session.append(HistoryEntry::child_of("b", "a"));
    let ids: Vec<&str> = session.entries().iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b"]);
}

#[test]
fn active_marker_is_single_valued() {
    let mut session = HistorySession::new();
    session.initialize(vec![HistoryEntry::root("a"), HistoryEntry::root("b")]);
    assert_eq!(session.active_id(), None);

    session.set_active("a");
    session.set_active("b");
    assert_eq!(session.active_id(), Some("b"));

    session.clear_active();
    assert_eq!(session.active_id(), None);
}

#[test]
fn initialize_drops_active_marker_for_removed_entry() {
    let mut session = HistorySession::new();
    session.initialize(vec![HistoryEntry::root("a")]);
    session.set_active("a");

    session.initialize(vec![HistoryEntry::root("b")]);
    assert_eq!(session.active_id(), None);
}

#[test]
fn session_from_executions_keeps_derivation_links() {
    let root = PromptExecution::new("explain lifetimes");
    let retry = PromptExecution::derived_from("explain lifetimes, shorter", &root);
    let session = HistorySession::from_executions([&root, &retry]);

    assert_eq!(session.len(), 2);
    assert_eq!(session.entries()[0].parent_id, None);
    assert_eq!(
        session.entries()[1].parent_id.as_deref(),
        Some(root.execution_id.as_str())
    );
}

#[test]
fn document_entries_win_over_executions() {
    let doc = HistoryDocument {
        entries: vec![HistoryEntry::root("explicit")],
        executions: vec![PromptExecution::new("ignored")],
        active_id: Some("explicit".to_string()),
    };
    let session = doc.into_session();
    assert_eq!(session.len(), 1);
    assert_eq!(session.entries()[0].id, "explicit");
    assert_eq!(session.active_id(), Some("explicit"));
}

#[test]
fn document_parses_entry_json() {
    let doc = HistoryDocument::from_json_str(
        r#"{
            "entries": [
                { "id": "a" },
                { "id": "b", "parentId": "a" }
            ],
            "activeId": "b"
        }"#,
    )
    .unwrap();
    let session = doc.into_session();
    assert_eq!(session.len(), 2);
    assert_eq!(session.entries()[1].parent_id.as_deref(), Some("a"));
    assert_eq!(session.active_id(), Some("b"));
}

#[test]
fn document_rejects_malformed_json() {
    let err = HistoryDocument::from_json_str("{ not json").unwrap_err();
    assert!(matches!(err, Error::Json(_)));
}
