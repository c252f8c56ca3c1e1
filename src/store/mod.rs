//! Store Module
//!
//! Transactional persistence for todo items. Callers open one [`StoreTx`] per
//! request, run their reads and writes through it and commit at the end.
//! Dropping a transaction without committing rolls it back.

mod postgres;
mod sqlite;

use std::sync::Arc;

use async_trait::async_trait;
use tracing::error;

use crate::config::DatabaseConfig;
use crate::error::{AppError, Result};
use crate::models::TodoItem;

pub use postgres::PostgresStore;
pub use sqlite::SqliteStore;

/// Shared handle to whichever backend is configured
pub type DynStore = Arc<dyn Store>;

/// Entry point into a persistence backend.
#[async_trait]
pub trait Store: Send + Sync {
    /// Opens a new transaction.
    async fn begin(&self) -> Result<Box<dyn StoreTx>>;

    /// Creates the `todo_items` table if it does not exist.
    async fn migrate(&self) -> Result<()>;

    /// Cheap round-trip to verify the backend is reachable.
    async fn health_check(&self) -> Result<()>;
}

/// Operations available inside one open transaction.
#[async_trait]
pub trait StoreTx: Send {
    /// All items ordered by id, optionally filtered by completion flag.
    async fn list(&mut self, done: Option<bool>) -> Result<Vec<TodoItem>>;

    async fn find(&mut self, id: i64) -> Result<Option<TodoItem>>;

    /// Inserts a row and returns it with its generated id.
    async fn insert(&mut self, task: &str, done: bool) -> Result<TodoItem>;

    /// Replaces task and done of an existing row; `None` if absent.
    async fn update(&mut self, id: i64, task: &str, done: bool) -> Result<Option<TodoItem>>;

    /// Deletes a row; `false` if absent.
    async fn delete(&mut self, id: i64) -> Result<bool>;

    /// Commits the transaction, consuming it.
    async fn commit(self: Box<Self>) -> Result<()>;
}

/// Connects to the backend described by `config` and ensures the schema.
pub async fn connect(config: &DatabaseConfig) -> Result<DynStore> {
    let store: DynStore = match config {
        DatabaseConfig::Postgres { .. } => Arc::new(PostgresStore::connect(config).await?),
        DatabaseConfig::Sqlite { path } => Arc::new(SqliteStore::open(path).await?),
    };
    store.migrate().await?;
    Ok(store)
}

/// Maps sqlx errors into the application taxonomy.
///
/// Integrity violations become conflicts; everything else is a store error.
pub fn map_sqlx_error(err: sqlx::Error) -> AppError {
    match err {
        sqlx::Error::Database(db)
            if db.is_unique_violation()
                || db.is_foreign_key_violation()
                || db.is_check_violation()
                || is_not_null_violation(db.code().as_deref(), db.message()) =>
        {
            AppError::Conflict(db.message().to_string())
        }
        other => {
            error!(error = %other, "Store operation failed");
            AppError::Store(other.to_string())
        }
    }
}

// Postgres reports SQLSTATE 23502; SQLite uses extended code 1299
fn is_not_null_violation(code: Option<&str>, message: &str) -> bool {
    matches!(code, Some("23502") | Some("1299")) || message.contains("NOT NULL constraint failed")
}
