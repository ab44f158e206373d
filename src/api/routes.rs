//! API route configuration.

use crate::api::handlers::{
    create_bookmark_handler, delete_bookmark_handler, get_bookmark_handler, list_bookmarks_handler,
    login_handler, me_handler, refresh_handler, register_handler, stats_handler,
    update_bookmark_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// Credential endpoints. Public, but rate limited more strictly.
///
/// # Endpoints
///
/// - `POST /register`       - Create an account
/// - `POST /login`          - Obtain access and refresh tokens
/// - `POST /token/refresh`  - Exchange a refresh token for a new access token
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register_handler))
        .route("/login", post(login_handler))
        .route("/token/refresh", post(refresh_handler))
}

/// Routes protected by access token authentication.
///
/// # Endpoints
///
/// - `GET    /me`               - Current user
/// - `GET    /bookmarks`        - List bookmarks (paginated)
/// - `POST   /bookmarks`        - Create a bookmark
/// - `GET    /bookmarks/stats`  - Visit counters for all bookmarks
/// - `GET    /bookmarks/{id}`   - Retrieve a bookmark
/// - `PUT    /bookmarks/{id}`   - Partially update a bookmark
/// - `DELETE /bookmarks/{id}`   - Delete a bookmark
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/me", get(me_handler))
        .route(
            "/bookmarks",
            get(list_bookmarks_handler).post(create_bookmark_handler),
        )
        .route("/bookmarks/stats", get(stats_handler))
        .route(
            "/bookmarks/{id}",
            get(get_bookmark_handler)
                .put(update_bookmark_handler)
                .delete(delete_bookmark_handler),
        )
}
