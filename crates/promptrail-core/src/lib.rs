#![forbid(unsafe_code)]

//! Prompt-execution history model (headless).
//!
//! Design goals:
//! - explicit in-memory forest instead of display-coupled state
//! - deterministic, testable outputs (no live surface required)
//! - tolerant of data-quality issues: duplicate ids, dangling parents, blank ids

pub mod config;
pub mod error;
pub mod execution;
pub mod geom;
pub mod history;
pub mod tree;

pub use config::HistoryConfig;
pub use error::{Error, Result};
pub use execution::{ExecutionStore, MemoryExecutionStore, PromptExecution};
pub use history::{HistoryDocument, HistoryEntry, HistorySession};
pub use tree::EntryIndex;

#[cfg(test)]
mod tests;
