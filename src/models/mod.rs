//! Request and Response models for the todo server API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP request and response bodies, plus the
//! public projection of a stored todo item.

pub mod requests;
pub mod responses;
pub mod todo;

// Re-export commonly used types
pub use requests::{ListParams, TodoPayload, MAX_TASK_LENGTH};
pub use responses::{ErrorResponse, HealthResponse, StatsResponse};
pub use todo::TodoItem;
