//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /`              - Plain-text greeting (public)
//! - `GET  /hello`         - JSON greeting (public)
//! - `GET  /health`        - Health check: database (public)
//! - `GET  /{short_url}`   - Short link redirect, counts a visit (public)
//! - `HEAD /{short_url}`   - Same redirect without counting (public)
//! - `POST /register`, `/login`, `/token/refresh` - Credentials (public, strict rate limit)
//! - `/me`, `/bookmarks/*` - Bookmark API (access token required)
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Panic recovery** - Panics become a JSON 500 response
//! - **Rate limiting** - Per-IP token bucket (configurable for proxy deployments)
//! - **Authentication** - Access token verification
//! - **Path normalization** - Trailing slash handling

use std::any::Any;

use crate::api;
use crate::api::handlers::{
    health_handler, hello_handler, index_handler, not_found_handler, redirect_handler,
    redirect_head_handler,
};
use crate::api::middleware::{RateLimitMode, auth, rate_limit, tracing};
use crate::error::AppError;
use crate::state::AppState;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Router, middleware};
use serde_json::json;
use tower::Layer;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Constructs the application router with all routes and middleware.
///
/// # Arguments
///
/// - `state` - shared application state injected into all handlers
/// - `rate_limit` - how clients are keyed for rate limiting; keyed modes need
///   the server to provide connect info
pub fn router(state: AppState, rate_limit: RateLimitMode) -> Router {
    let api_router = rate_limit::api(
        api::routes::protected_routes()
            .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer)),
        rate_limit,
    );

    let auth_router = rate_limit::auth(api::routes::auth_routes(), rate_limit);

    Router::new()
        .route("/", get(index_handler))
        .route("/hello", get(hello_handler))
        .route("/health", get(health_handler))
        .route(
            "/{short_url}",
            get(redirect_handler).head(redirect_head_handler),
        )
        .merge(auth_router)
        .merge(api_router)
        .fallback(not_found_handler)
        .with_state(state)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(tracing::layer())
}

/// [`router`] wrapped in trailing-slash normalization, as served in production.
pub fn app_router(state: AppState, rate_limit: RateLimitMode) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(router(state, rate_limit))
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let reason = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };

    AppError::internal("Handler panicked", json!({ "reason": reason })).into_response()
}
