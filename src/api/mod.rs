//! API Module
//!
//! HTTP handlers, routing and middleware for the todo server REST API.
//!
//! # Endpoints
//! - `GET /todo`, `POST /todo` - List and create items
//! - `GET /todo/:id`, `PUT /todo/:id`, `DELETE /todo/:id` - Single item
//! - `GET /stats` - Cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod middleware;
pub mod rate_limit;
pub mod routes;

pub use handlers::*;
pub use middleware::ClientHost;
pub use rate_limit::RateLimiter;
pub use routes::create_router;
