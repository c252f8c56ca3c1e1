//! API Middleware
//!
//! Client identification, per-client throttling, and the post-response
//! cache janitor hook.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    async_trait,
    body::Body,
    extract::{ConnectInfo, FromRequestParts, State},
    http::{header, request::Parts, Extensions, HeaderMap, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::{debug, warn};

use super::handlers::AppState;
use crate::error::AppError;

/// Paths that are never throttled
const UNTHROTTLED_PATHS: [&str; 1] = ["/health"];

/// The requesting host, used as both the cache key and the throttling key.
///
/// Resolved from the peer address when the server runs with connect info,
/// then from the `Host` header, then a fixed fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientHost(pub String);

impl ClientHost {
    pub fn resolve(extensions: &Extensions, headers: &HeaderMap) -> Self {
        if let Some(ConnectInfo(addr)) = extensions.get::<ConnectInfo<SocketAddr>>() {
            return ClientHost(addr.ip().to_string());
        }

        headers
            .get(header::HOST)
            .and_then(|value| value.to_str().ok())
            .map(|host| ClientHost(host.to_string()))
            .unwrap_or_else(|| ClientHost("unknown".to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for ClientHost
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(ClientHost::resolve(&parts.extensions, &parts.headers))
    }
}

/// Rejects clients that exceeded their per-minute budget.
pub async fn rate_limit(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    if UNTHROTTLED_PATHS.contains(&request.uri().path()) {
        return next.run(request).await;
    }

    let client = ClientHost::resolve(request.extensions(), request.headers());

    let (allowed, remaining) = state.rate_limiter.allow(client.as_str());
    if !allowed {
        warn!(client = client.as_str(), limit = state.rate_limiter.limit(), "Rate limit exceeded");
        return AppError::RateLimited {
            retry_after: state.rate_limiter.retry_after_secs(),
        }
        .into_response();
    }

    debug!(client = client.as_str(), remaining, "Request admitted");
    next.run(request).await
}

/// Lets the janitor sweep once the handler has produced its response.
///
/// The sweep runs on its own task so the response is not held back by the
/// cache write lock. A sweep that ran also prunes idle rate limit buckets.
pub async fn sweep_after_response(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let response = next.run(request).await;

    let janitor = Arc::clone(&state.janitor);
    let rate_limiter = state.rate_limiter.clone();
    tokio::spawn(async move {
        if janitor.after_request().await.is_some() {
            let pruned = rate_limiter.prune();
            if pruned > 0 {
                debug!(pruned, "Pruned idle rate limit buckets");
            }
        }
    });

    response
}
