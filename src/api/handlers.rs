//! API Handlers
//!
//! HTTP request handlers for the todo resource and the service endpoints.

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::error;

use super::middleware::ClientHost;
use super::rate_limit::RateLimiter;
use crate::cache::{self, SharedCache};
use crate::config::Config;
use crate::error::Result;
use crate::models::{
    ErrorResponse, HealthResponse, ListParams, StatsResponse, TodoItem, TodoPayload,
};
use crate::service::TodoService;
use crate::store::DynStore;
use crate::tasks::Janitor;

/// Application state shared across all handlers.
///
/// The cache and janitor state are process-wide; store transactions are
/// opened per request inside the service.
#[derive(Clone)]
pub struct AppState {
    /// Todo orchestration (store + cache)
    pub service: TodoService,
    /// Throttled expiry sweeper
    pub janitor: Arc<Janitor>,
    /// Per-client request budget
    pub rate_limiter: RateLimiter,
}

impl AppState {
    pub fn new(service: TodoService, janitor: Janitor, rate_limiter: RateLimiter) -> Self {
        Self {
            service,
            janitor: Arc::new(janitor),
            rate_limiter,
        }
    }

    /// Creates a new AppState from configuration with a fresh cache.
    pub fn from_config(store: DynStore, config: &Config) -> Self {
        let cache = cache::shared();
        let service = TodoService::new(store, cache.clone(), config.cache_ttl());
        let janitor = Janitor::new(cache, config.sweep_interval());
        let rate_limiter = RateLimiter::per_minute(config.rate_limit_per_minute);
        Self::new(service, janitor, rate_limiter)
    }

    pub fn cache(&self) -> &SharedCache {
        self.service.cache()
    }
}

/// Handler for GET /
pub async fn index_handler() -> Json<&'static str> {
    Json("Hello, world!")
}

/// Handler for GET /todo
///
/// Without `done` the list is read through the cache keyed by client host.
pub async fn list_handler(
    State(state): State<AppState>,
    client: ClientHost,
    params: std::result::Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<Vec<TodoItem>>> {
    let Query(params) = params?;
    let items = state.service.list(client.as_str(), params.done).await?;
    Ok(Json(items))
}

/// Handler for POST /todo
pub async fn create_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<TodoPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<TodoItem>)> {
    let Json(payload) = payload?;
    let item = state.service.create(payload).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// Handler for GET /todo/:id
pub async fn get_item_handler(
    State(state): State<AppState>,
    id: std::result::Result<Path<i64>, PathRejection>,
) -> Result<Json<TodoItem>> {
    let Path(id) = id?;
    Ok(Json(state.service.get(id).await?))
}

/// Handler for PUT /todo/:id
pub async fn update_handler(
    State(state): State<AppState>,
    id: std::result::Result<Path<i64>, PathRejection>,
    payload: std::result::Result<Json<TodoPayload>, JsonRejection>,
) -> Result<Json<TodoItem>> {
    let Path(id) = id?;
    let Json(payload) = payload?;
    Ok(Json(state.service.update(id, payload).await?))
}

/// Handler for DELETE /todo/:id
pub async fn delete_handler(
    State(state): State<AppState>,
    id: std::result::Result<Path<i64>, PathRejection>,
) -> Result<StatusCode> {
    let Path(id) = id?;
    state.service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let stats = state.cache().read().await.stats();
    Json(StatsResponse::from(stats))
}

/// Handler for GET /health
///
/// Healthy only while the store answers.
pub async fn health_handler(State(state): State<AppState>) -> Response {
    match state.service.store().health_check().await {
        Ok(()) => Json(HealthResponse::healthy()).into_response(),
        Err(err) => {
            error!(error = %err, "Store health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ErrorResponse::new("Store unavailable")),
            )
                .into_response()
        }
    }
}
