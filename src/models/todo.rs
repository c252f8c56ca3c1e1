//! Todo item projection
//!
//! The only shape of a todo item that leaves the store layer. Store backends
//! decode their own row types and convert into this record.

use serde::{Deserialize, Serialize};

/// A single todo item as returned by the API and held in cache snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoItem {
    /// Store-assigned identity, immutable after creation
    pub id: i64,
    /// Task description (1..=255 characters)
    pub task: String,
    /// Completion flag
    pub done: bool,
}

impl TodoItem {
    pub fn new(id: i64, task: impl Into<String>, done: bool) -> Self {
        Self {
            id,
            task: task.into(),
            done,
        }
    }
}
