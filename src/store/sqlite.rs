//! SQLite-backed store, used when no Postgres connection is configured.

use std::str::FromStr;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::{Sqlite, Transaction};
use tracing::debug;

use super::{map_sqlx_error, Store, StoreTx};
use crate::error::Result;
use crate::models::TodoItem;

const CREATE_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS todo_items (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        task TEXT NOT NULL,
        done BOOLEAN NOT NULL DEFAULT FALSE
    )
"#;

#[derive(sqlx::FromRow)]
struct TodoRow {
    id: i64,
    task: String,
    done: bool,
}

impl From<TodoRow> for TodoItem {
    fn from(row: TodoRow) -> Self {
        Self {
            id: row.id,
            task: row.task,
            done: row.done,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Opens (creating if missing) a database file.
    pub async fn open(path: &str) -> Result<Self> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(map_sqlx_error)?;
        debug!(path, "Opened SQLite store");
        Ok(Self { pool })
    }

    /// Private in-memory database with the schema applied.
    ///
    /// Uses a single connection that is never recycled, since every
    /// connection to `:memory:` would otherwise see its own empty database.
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:").map_err(map_sqlx_error)?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(map_sqlx_error)?;
        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }
}

#[async_trait]
impl Store for SqliteStore {
    async fn begin(&self) -> Result<Box<dyn StoreTx>> {
        let tx = self.pool.begin().await.map_err(map_sqlx_error)?;
        Ok(Box::new(SqliteTx { tx }))
    }

    async fn migrate(&self) -> Result<()> {
        sqlx::query(CREATE_TABLE)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(())
    }

    async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(map_sqlx_error)
    }
}

struct SqliteTx {
    tx: Transaction<'static, Sqlite>,
}

#[async_trait]
impl StoreTx for SqliteTx {
    async fn list(&mut self, done: Option<bool>) -> Result<Vec<TodoItem>> {
        let rows = match done {
            Some(done) => {
                sqlx::query_as::<_, TodoRow>(
                    "SELECT id, task, done FROM todo_items WHERE done = ? ORDER BY id",
                )
                .bind(done)
                .fetch_all(&mut *self.tx)
                .await
            }
            None => {
                sqlx::query_as::<_, TodoRow>("SELECT id, task, done FROM todo_items ORDER BY id")
                    .fetch_all(&mut *self.tx)
                    .await
            }
        }
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(TodoItem::from).collect())
    }

    async fn find(&mut self, id: i64) -> Result<Option<TodoItem>> {
        let row = sqlx::query_as::<_, TodoRow>("SELECT id, task, done FROM todo_items WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(map_sqlx_error)?;
        Ok(row.map(TodoItem::from))
    }

    async fn insert(&mut self, task: &str, done: bool) -> Result<TodoItem> {
        let row = sqlx::query_as::<_, TodoRow>(
            "INSERT INTO todo_items (task, done) VALUES (?, ?) RETURNING id, task, done",
        )
        .bind(task)
        .bind(done)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(map_sqlx_error)?;
        Ok(row.into())
    }

    async fn update(&mut self, id: i64, task: &str, done: bool) -> Result<Option<TodoItem>> {
        let row = sqlx::query_as::<_, TodoRow>(
            "UPDATE todo_items SET task = ?, done = ? WHERE id = ? RETURNING id, task, done",
        )
        .bind(task)
        .bind(done)
        .bind(id)
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(map_sqlx_error)?;
        Ok(row.map(TodoItem::from))
    }

    async fn delete(&mut self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM todo_items WHERE id = ?")
            .bind(id)
            .execute(&mut *self.tx)
            .await
            .map_err(map_sqlx_error)?;
        Ok(result.rows_affected() > 0)
    }

    async fn commit(self: Box<Self>) -> Result<()> {
        self.tx.commit().await.map_err(map_sqlx_error)
    }
}
