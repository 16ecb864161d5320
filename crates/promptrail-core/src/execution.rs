use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One persisted prompt execution.
///
/// `previous_id` points at the execution this one was derived from, if any.
/// Identifier uniqueness is not enforced at this layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptExecution {
    #[serde(rename = "executionId")]
    pub execution_id: String,
    #[serde(default, rename = "previousId")]
    pub previous_id: Option<String>,
    #[serde(default)]
    pub prompt: String,
    #[serde(default, rename = "llmPlatform")]
    pub llm_platform: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub configuration: Option<String>,
    #[serde(default)]
    pub response: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl PromptExecution {
    /// Creates a root execution with a fresh id and current timestamps.
    pub fn new(prompt: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            execution_id: uuid::Uuid::new_v4().to_string(),
            previous_id: None,
            prompt: prompt.into(),
            llm_platform: None,
            model: None,
            configuration: None,
            response: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Creates an execution derived from `previous`.
    pub fn derived_from(prompt: impl Into<String>, previous: &PromptExecution) -> Self {
        let mut execution = Self::new(prompt);
        execution.previous_id = Some(previous.execution_id.clone());
        execution
    }

    pub fn with_response(mut self, response: impl Into<String>) -> Self {
        self.response = Some(response.into());
        self.updated_at = Utc::now();
        self
    }

    pub fn with_model(
        mut self,
        llm_platform: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        self.llm_platform = Some(llm_platform.into());
        self.model = Some(model.into());
        self
    }
}

/// Persistence boundary for execution records.
///
/// Real deployments put a database behind this; the core only needs an ordered
/// collection it can replay into a session.
pub trait ExecutionStore {
    /// Appends a record, assigning an execution id when the record carries none.
    /// Returns the id under which the record was stored.
    fn append(&mut self, execution: PromptExecution) -> Result<String>;

    /// All records, in insertion order.
    fn list(&self) -> Vec<PromptExecution>;

    fn get(&self, execution_id: &str) -> Option<PromptExecution>;
}

/// In-memory `ExecutionStore` for sessions and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryExecutionStore {
    by_id: IndexMap<String, PromptExecution>,
}

impl MemoryExecutionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

impl ExecutionStore for MemoryExecutionStore {
    fn append(&mut self, mut execution: PromptExecution) -> Result<String> {
        if execution.execution_id.trim().is_empty() {
            execution.execution_id = uuid::Uuid::new_v4().to_string();
        }
        let id = execution.execution_id.clone();
        if let Some(previous_id) = execution.previous_id.as_deref() {
            if !self.by_id.contains_key(previous_id) {
                return Err(Error::Store {
                    message: format!("previous execution not found: {previous_id}"),
                });
            }
        }
        self.by_id.insert(id.clone(), execution);
        Ok(id)
    }

    fn list(&self) -> Vec<PromptExecution> {
        self.by_id.values().cloned().collect()
    }

    fn get(&self, execution_id: &str) -> Option<PromptExecution> {
        self.by_id.get(execution_id).cloned()
    }
}
