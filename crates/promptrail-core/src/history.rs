use crate::error::Result;
use crate::execution::PromptExecution;
use serde::{Deserialize, Serialize};

/// One history item: a past prompt execution as the view layer sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: String,
    #[serde(default, rename = "parentId")]
    pub parent_id: Option<String>,
}

impl HistoryEntry {
    pub fn root(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            parent_id: None,
        }
    }

    pub fn child_of(id: impl Into<String>, parent_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            parent_id: Some(parent_id.into()),
        }
    }

    pub fn from_execution(execution: &PromptExecution) -> Self {
        Self {
            id: execution.execution_id.clone(),
            parent_id: execution.previous_id.clone(),
        }
    }
}

/// Ordered history of the current session plus the active marker.
///
/// The entry list is append-only between re-initializations; entries are never
/// mutated once added. At most one entry is active at a time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistorySession {
    entries: Vec<HistoryEntry>,
    active_id: Option<String>,
}

impl HistorySession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the entry list wholesale. The active marker is kept only if it
    /// still names an entry.
    pub fn initialize(&mut self, entries: impl IntoIterator<Item = HistoryEntry>) {
        self.entries = entries.into_iter().collect();
        let stale = match self.active_id.as_deref() {
            Some(active) => !self.entries.iter().any(|e| e.id == active),
            None => false,
        };
        if stale {
            tracing::debug!("active entry no longer present after re-initialization, clearing marker");
            self.active_id = None;
        }
    }

    pub fn append(&mut self, entry: HistoryEntry) {
        self.entries.push(entry);
    }

    pub fn set_active(&mut self, id: impl Into<String>) {
        self.active_id = Some(id.into());
    }

    pub fn clear_active(&mut self) {
        self.active_id = None;
    }

    pub fn active_id(&self) -> Option<&str> {
        self.active_id.as_deref()
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn from_executions<'a>(executions: impl IntoIterator<Item = &'a PromptExecution>) -> Self {
        let mut session = Self::new();
        session.initialize(executions.into_iter().map(HistoryEntry::from_execution));
        session
    }
}

/// Serialized history as hosts hand it over: either raw entries or full
/// execution records, plus the active marker. When both lists are present the
/// explicit entries win.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HistoryDocument {
    #[serde(default)]
    pub entries: Vec<HistoryEntry>,
    #[serde(default)]
    pub executions: Vec<PromptExecution>,
    #[serde(default, rename = "activeId")]
    pub active_id: Option<String>,
}

impl HistoryDocument {
    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn into_session(self) -> HistorySession {
        let mut session = if self.entries.is_empty() {
            HistorySession::from_executions(&self.executions)
        } else {
            let mut session = HistorySession::new();
            session.initialize(self.entries);
            session
        };
        if let Some(active) = self.active_id {
            session.set_active(active);
        }
        session
    }
}
