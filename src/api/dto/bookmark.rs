//! DTOs for bookmark endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::api::dto::pagination::PaginationMeta;
use crate::domain::entities::{Bookmark, BookmarkPatch, VisitStats};

/// Request body for `POST /bookmarks`.
///
/// `url` is checked for shape by the service, which also normalizes it. `body`
/// is limited to 10 000 characters.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateBookmarkRequest {
    #[validate(length(min = 1, message = "URL is required"))]
    pub url: String,

    #[serde(default)]
    #[validate(length(max = 10000))]
    pub body: String,
}

/// Request body for `PUT /bookmarks/{id}`. Omitted fields are left unchanged.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateBookmarkRequest {
    #[validate(length(min = 1, message = "URL must not be empty"))]
    pub url: Option<String>,

    #[validate(length(max = 10000))]
    pub body: Option<String>,
}

impl From<UpdateBookmarkRequest> for BookmarkPatch {
    fn from(req: UpdateBookmarkRequest) -> Self {
        Self {
            body: req.body,
            url: req.url,
        }
    }
}

/// JSON representation of a bookmark.
#[derive(Debug, Serialize)]
pub struct BookmarkResponse {
    pub id: i64,
    pub url: String,
    pub short_url: String,
    pub visits: i64,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Bookmark> for BookmarkResponse {
    fn from(b: Bookmark) -> Self {
        Self {
            id: b.id,
            url: b.url,
            short_url: b.short_url,
            visits: b.visits,
            body: b.body,
            created_at: b.created_at,
            updated_at: b.updated_at,
        }
    }
}

/// Body of `GET /bookmarks`.
#[derive(Debug, Serialize)]
pub struct BookmarkListResponse {
    pub data: Vec<BookmarkResponse>,
    pub meta: PaginationMeta,
}

/// One entry of `GET /bookmarks/stats`.
#[derive(Debug, Serialize)]
pub struct VisitStatsItem {
    pub id: i64,
    pub url: String,
    pub short_url: String,
    pub visits: i64,
}

impl From<VisitStats> for VisitStatsItem {
    fn from(s: VisitStats) -> Self {
        Self {
            id: s.id,
            url: s.url,
            short_url: s.short_url,
            visits: s.visits,
        }
    }
}

/// Body of `GET /bookmarks/stats`.
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub data: Vec<VisitStatsItem>,
}
