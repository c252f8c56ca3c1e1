//! Todo Cache - A small todo CRUD server
//!
//! Serves todo items from a transactional store, with a read-through list
//! cache invalidated on every write and a request-driven expiry sweep.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod service;
pub mod store;
pub mod tasks;

pub use api::{create_router, AppState};
pub use config::Config;
pub use service::TodoService;
