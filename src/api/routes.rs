//! API Routes
//!
//! Configures the Axum router with the todo resource and service endpoints.

use axum::{middleware, routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    create_handler, delete_handler, get_item_handler, health_handler, index_handler,
    list_handler, stats_handler, update_handler, AppState,
};
use super::middleware::{rate_limit, sweep_after_response};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /` - Greeting
/// - `GET /todo` - List items (`?done=true|false` bypasses the cache)
/// - `POST /todo` - Create an item
/// - `GET /todo/:id` - Fetch one item
/// - `PUT /todo/:id` - Replace task and done of an item
/// - `DELETE /todo/:id` - Delete an item
/// - `GET /stats` - Cache statistics
/// - `GET /health` - Health check endpoint
///
/// # Middleware (outermost first)
/// - Tracing: Logs all requests
/// - CORS: Allows any origin, method and header
/// - Rate limiting: Per-client budget, rejected requests never reach handlers
/// - Janitor: Sweeps expired cache entries after the response is built
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(index_handler))
        .route("/todo", get(list_handler).post(create_handler))
        .route(
            "/todo/:id",
            get(get_item_handler)
                .put(update_handler)
                .delete(delete_handler),
        )
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            sweep_after_response,
        ))
        .layer(middleware::from_fn_with_state(state.clone(), rate_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
