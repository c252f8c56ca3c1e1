//! Postgres-backed store, used when the full DB_* connection set is configured.

use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use sqlx::{Postgres, Transaction};
use tracing::debug;

use super::{map_sqlx_error, Store, StoreTx};
use crate::config::DatabaseConfig;
use crate::error::{AppError, Result};
use crate::models::TodoItem;

const CREATE_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS todo_items (
        id BIGSERIAL PRIMARY KEY,
        task VARCHAR(255) NOT NULL,
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
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Connects using discrete connection parameters, so credentials never
    /// need URL escaping.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let DatabaseConfig::Postgres {
            host,
            port,
            name,
            user,
            password,
        } = config
        else {
            return Err(AppError::Internal(
                "Postgres store requires a Postgres configuration".to_string(),
            ));
        };

        let options = PgConnectOptions::new()
            .host(host)
            .port(*port)
            .database(name)
            .username(user)
            .password(password)
            // Poolers such as pgbouncer reject cached prepared statements
            .statement_cache_capacity(0);

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect_with(options)
            .await
            .map_err(map_sqlx_error)?;
        debug!(%host, port, database = %name, "Connected to Postgres store");
        Ok(Self { pool })
    }
}

#[async_trait]
impl Store for PostgresStore {
    async fn begin(&self) -> Result<Box<dyn StoreTx>> {
        let tx = self.pool.begin().await.map_err(map_sqlx_error)?;
        Ok(Box::new(PostgresTx { tx }))
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

struct PostgresTx {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl StoreTx for PostgresTx {
    async fn list(&mut self, done: Option<bool>) -> Result<Vec<TodoItem>> {
        // NULL filter means "no filter"
        let rows = sqlx::query_as::<_, TodoRow>(
            r#"
            SELECT id, task, done
            FROM todo_items
            WHERE $1::BOOLEAN IS NULL OR done = $1
            ORDER BY id
            "#,
        )
        .bind(done)
        .fetch_all(&mut *self.tx)
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(TodoItem::from).collect())
    }

    async fn find(&mut self, id: i64) -> Result<Option<TodoItem>> {
        let row =
            sqlx::query_as::<_, TodoRow>("SELECT id, task, done FROM todo_items WHERE id = $1")
                .bind(id)
                .fetch_optional(&mut *self.tx)
                .await
                .map_err(map_sqlx_error)?;
        Ok(row.map(TodoItem::from))
    }

    async fn insert(&mut self, task: &str, done: bool) -> Result<TodoItem> {
        let row = sqlx::query_as::<_, TodoRow>(
            "INSERT INTO todo_items (task, done) VALUES ($1, $2) RETURNING id, task, done",
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
            "UPDATE todo_items SET task = $1, done = $2 WHERE id = $3 RETURNING id, task, done",
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
        let result = sqlx::query("DELETE FROM todo_items WHERE id = $1")
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
