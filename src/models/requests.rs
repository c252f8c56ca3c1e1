//! Request DTOs for the todo server API
//!
//! Defines the structure of incoming HTTP request bodies and query strings.

use serde::Deserialize;

use crate::error::{AppError, Result};

/// Maximum task length, counted in characters
pub const MAX_TASK_LENGTH: usize = 255;

/// Request body for creating (POST /todo) and replacing (PUT /todo/:id) an item
///
/// # Fields
/// - `task`: Task description, 1 to 255 characters
/// - `done`: Completion flag (defaults to false)
#[derive(Debug, Clone, Deserialize)]
pub struct TodoPayload {
    /// The task description
    pub task: String,
    /// Completion flag
    #[serde(default)]
    pub done: bool,
}

impl TodoPayload {
    pub fn new(task: impl Into<String>, done: bool) -> Self {
        Self {
            task: task.into(),
            done,
        }
    }

    /// Validates the payload, reporting the first violated rule.
    pub fn validate(&self) -> Result<()> {
        if self.task.is_empty() {
            return Err(AppError::validation("task must not be empty"));
        }
        if self.task.chars().count() > MAX_TASK_LENGTH {
            return Err(AppError::validation(format!(
                "task must be at most {} characters",
                MAX_TASK_LENGTH
            )));
        }
        Ok(())
    }
}

/// Query parameters for GET /todo
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListParams {
    /// Optional completion filter; absent means the unfiltered (cacheable) list
    #[serde(default)]
    pub done: Option<bool>,
}
