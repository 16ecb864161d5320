use crate::history::HistoryEntry;
use indexmap::IndexMap;

/// Lookup from entry id to its position in the source sequence.
///
/// Rebuilt from scratch on every draw pass, since entries can be added or
/// removed between passes. Duplicate ids are a data-quality issue, not an
/// error: the last occurrence wins. Blank ids are never keyed, so they can
/// neither be looked up nor matched as anyone's parent.
#[derive(Debug, Clone, Default)]
pub struct EntryIndex {
    by_id: IndexMap<String, usize>,
}

impl EntryIndex {
    /// Builds the index from the ids of a rendered sequence, in order.
    pub fn build<'a>(ids: impl IntoIterator<Item = &'a str>) -> Self {
        let mut by_id = IndexMap::new();
        for (position, id) in ids.into_iter().enumerate() {
            if id.trim().is_empty() {
                continue;
            }
            by_id.insert(id.to_string(), position);
        }
        Self { by_id }
    }

    pub fn from_entries(entries: &[HistoryEntry]) -> Self {
        Self::build(entries.iter().map(|e| e.id.as_str()))
    }

    pub fn get(&self, id: &str) -> Option<usize> {
        self.by_id.get(id).copied()
    }

    /// One-level parent resolution. Parents are never traversed further, so a
    /// cyclic reference cannot cause non-termination downstream.
    pub fn resolve_parent(&self, entry: &HistoryEntry) -> Option<usize> {
        self.get(entry.parent_id.as_deref()?)
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}
