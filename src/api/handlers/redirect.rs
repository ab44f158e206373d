//! Handlers for short URL redirects.

use axum::{
    extract::{Path, State},
    response::Redirect,
};

use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short code to its bookmarked URL.
///
/// # Endpoint
///
/// `GET /{short_url}`
///
/// The visit counter is incremented atomically before the redirect is issued.
/// No authentication is required.
///
/// # Errors
///
/// Returns 404 Not Found if no bookmark uses the short code.
pub async fn redirect_handler(
    Path(short_url): Path<String>,
    State(state): State<AppState>,
) -> Result<Redirect, AppError> {
    let url = state.bookmark_service.resolve(&short_url).await?;
    Ok(Redirect::temporary(&url))
}

/// Answers `HEAD /{short_url}` with the redirect target, without counting a visit.
///
/// Link preview crawlers probe with `HEAD`; only `GET` is a visit.
///
/// # Errors
///
/// Returns 404 Not Found if no bookmark uses the short code.
pub async fn redirect_head_handler(
    Path(short_url): Path<String>,
    State(state): State<AppState>,
) -> Result<Redirect, AppError> {
    let url = state.bookmark_service.peek(&short_url).await?;
    Ok(Redirect::temporary(&url))
}
