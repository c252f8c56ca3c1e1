//! Todo Service
//!
//! Binds store reads and writes to cache population and invalidation.
//!
//! - The unfiltered list is read through the cache, keyed by client host.
//! - Filtered lists and single-item reads always go to the store.
//! - Every write commits first and then clears the whole cache.

use std::time::Duration;

use bytes::Bytes;
use tracing::{debug, warn};

use crate::cache::SharedCache;
use crate::error::{AppError, Result};
use crate::models::{TodoItem, TodoPayload};
use crate::store::DynStore;

#[derive(Clone)]
pub struct TodoService {
    store: DynStore,
    cache: SharedCache,
    ttl: Duration,
}

impl TodoService {
    pub fn new(store: DynStore, cache: SharedCache, ttl: Duration) -> Self {
        Self { store, cache, ttl }
    }

    pub fn cache(&self) -> &SharedCache {
        &self.cache
    }

    pub fn store(&self) -> &DynStore {
        &self.store
    }

    // == List ==
    /// Lists items. Without a filter the result is served from, or stored
    /// into, the cache entry for `cache_key`.
    pub async fn list(&self, cache_key: &str, done: Option<bool>) -> Result<Vec<TodoItem>> {
        if done.is_some() {
            return self.read_list(done).await;
        }

        if let Some(items) = self.cached_list(cache_key).await {
            return Ok(items);
        }

        // Observed before the store read so a concurrent write invalidating
        // in between keeps this snapshot out of the cache
        let generation = self.cache.read().await.generation();
        let items = self.read_list(None).await?;

        match serde_json::to_vec(&items) {
            Ok(snapshot) => {
                let stored = self.cache.write().await.set_if_current(
                    cache_key,
                    Bytes::from(snapshot),
                    self.ttl,
                    generation,
                );
                debug!(cache_key, stored, count = items.len(), "Cache miss for todo list");
            }
            Err(err) => warn!(error = %err, "Failed to serialize todo list snapshot"),
        }

        Ok(items)
    }

    // == Get ==
    pub async fn get(&self, id: i64) -> Result<TodoItem> {
        let mut tx = self.store.begin().await?;
        let item = tx.find(id).await?.ok_or(AppError::NotFound(id))?;
        tx.commit().await?;
        Ok(item)
    }

    // == Create ==
    pub async fn create(&self, payload: TodoPayload) -> Result<TodoItem> {
        payload.validate()?;

        let mut tx = self.store.begin().await?;
        let item = tx.insert(&payload.task, payload.done).await?;
        tx.commit().await?;

        self.invalidate().await;
        Ok(item)
    }

    // == Update ==
    pub async fn update(&self, id: i64, payload: TodoPayload) -> Result<TodoItem> {
        payload.validate()?;

        let mut tx = self.store.begin().await?;
        let item = tx
            .update(id, &payload.task, payload.done)
            .await?
            .ok_or(AppError::NotFound(id))?;
        tx.commit().await?;

        self.invalidate().await;
        Ok(item)
    }

    // == Delete ==
    pub async fn delete(&self, id: i64) -> Result<()> {
        let mut tx = self.store.begin().await?;
        if !tx.delete(id).await? {
            return Err(AppError::NotFound(id));
        }
        tx.commit().await?;

        self.invalidate().await;
        Ok(())
    }

    async fn read_list(&self, done: Option<bool>) -> Result<Vec<TodoItem>> {
        let mut tx = self.store.begin().await?;
        let items = tx.list(done).await?;
        tx.commit().await?;
        Ok(items)
    }

    /// Cached snapshot for `cache_key`, if present and decodable.
    async fn cached_list(&self, cache_key: &str) -> Option<Vec<TodoItem>> {
        let snapshot = self.cache.write().await.get(cache_key)?;
        match serde_json::from_slice(&snapshot) {
            Ok(items) => {
                debug!(cache_key, "Cache hit for todo list");
                Some(items)
            }
            Err(err) => {
                warn!(cache_key, error = %err, "Discarding undecodable cache snapshot");
                None
            }
        }
    }

    // Runs only after a successful commit
    async fn invalidate(&self) {
        let removed = self.cache.write().await.delete_all();
        debug!(removed, "Invalidated todo list cache");
    }
}
