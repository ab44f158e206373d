//! Handlers for bookmark management endpoints.
//!
//! Every handler runs behind [`crate::api::middleware::auth::layer`] and only
//! ever touches bookmarks owned by the authenticated user. Bookmarks owned by
//! someone else are reported as not found.

use axum::{
    Extension, Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
};
use validator::Validate;

use crate::api::dto::bookmark::{
    BookmarkListResponse, BookmarkResponse, CreateBookmarkRequest, StatsResponse,
    UpdateBookmarkRequest,
};
use crate::api::dto::pagination::{PaginationMeta, PaginationParams};
use crate::api::middleware::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Creates a bookmark with a freshly generated short code.
///
/// # Endpoint
///
/// `POST /bookmarks`
///
/// # Request Body
///
/// ```json
/// { "url": "https://example.com/article", "body": "Read later" }
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request if the URL is not a valid http(s) URL.
pub async fn create_bookmark_handler(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    payload: Result<Json<CreateBookmarkRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<BookmarkResponse>), AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let bookmark = state
        .bookmark_service
        .create(auth.id, payload.body, &payload.url)
        .await?;

    Ok((StatusCode::CREATED, Json(bookmark.into())))
}

/// Lists the user's bookmarks, newest first.
///
/// # Endpoint
///
/// `GET /bookmarks?page=1&per_page=5`
///
/// # Query Parameters
///
/// - `page` - page number, starting at 1 (default: 1)
/// - `per_page` - items per page, 1-100 (default: 5)
///
/// # Response
///
/// ```json
/// {
///   "data": [ { "id": 3, "url": "...", "short_url": "...", ... } ],
///   "meta": {
///     "page": 1, "pages": 1, "per_page": 5, "total_count": 1,
///     "prev_page": null, "next_page": null, "has_next": false, "has_prev": false
///   }
/// }
/// ```
pub async fn list_bookmarks_handler(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    params: Result<Query<PaginationParams>, QueryRejection>,
) -> Result<Json<BookmarkListResponse>, AppError> {
    let Query(params) = params?;
    let page = params.validate()?;

    let (bookmarks, total) = state
        .bookmark_service
        .list(auth.id, page.offset(), page.limit())
        .await?;

    Ok(Json(BookmarkListResponse {
        data: bookmarks.into_iter().map(Into::into).collect(),
        meta: PaginationMeta::new(page, total),
    }))
}

/// Returns a single bookmark.
///
/// # Endpoint
///
/// `GET /bookmarks/{id}`
///
/// # Errors
///
/// Returns 404 Not Found if the bookmark does not exist or belongs to another user.
pub async fn get_bookmark_handler(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<BookmarkResponse>, AppError> {
    let Path(id) = id?;
    let bookmark = state.bookmark_service.get(auth.id, id).await?;
    Ok(Json(bookmark.into()))
}

/// Partially updates a bookmark.
///
/// # Endpoint
///
/// `PUT /bookmarks/{id}`
///
/// # Request Body
///
/// Both fields are optional. Only provided fields are changed.
///
/// ```json
/// { "url": "https://example.com/new", "body": "Updated notes" }
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request if the new URL is invalid.
/// Returns 404 Not Found if the bookmark does not exist or belongs to another user.
pub async fn update_bookmark_handler(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<UpdateBookmarkRequest>, JsonRejection>,
) -> Result<Json<BookmarkResponse>, AppError> {
    let Path(id) = id?;
    let Json(payload) = payload?;
    payload.validate()?;

    let bookmark = state
        .bookmark_service
        .update(auth.id, id, payload.into())
        .await?;

    Ok(Json(bookmark.into()))
}

/// Deletes a bookmark.
///
/// # Endpoint
///
/// `DELETE /bookmarks/{id}`
///
/// # Errors
///
/// Returns 404 Not Found if the bookmark does not exist or belongs to another user.
pub async fn delete_bookmark_handler(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, AppError> {
    let Path(id) = id?;
    state.bookmark_service.delete(auth.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Visit counters for all of the user's bookmarks.
///
/// # Endpoint
///
/// `GET /bookmarks/stats`
pub async fn stats_handler(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<StatsResponse>, AppError> {
    let stats = state.bookmark_service.visit_stats(auth.id).await?;

    Ok(Json(StatsResponse {
        data: stats.into_iter().map(Into::into).collect(),
    }))
}
