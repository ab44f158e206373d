//! Bookmark entity representing a saved URL and its short alias.

use chrono::{DateTime, Utc};

/// A bookmark owned by a single user.
///
/// `short_url` is the globally unique short code resolved by the public
/// redirect endpoint. `visits` only ever grows.
#[derive(Debug, Clone)]
pub struct Bookmark {
    pub id: i64,
    pub body: String,
    pub url: String,
    pub short_url: String,
    pub visits: i64,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input data for creating a new bookmark.
#[derive(Debug, Clone)]
pub struct NewBookmark {
    pub body: String,
    pub url: String,
    pub short_url: String,
    pub user_id: i64,
}

/// Partial update for an existing bookmark.
///
/// `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct BookmarkPatch {
    pub body: Option<String>,
    pub url: Option<String>,
}

impl BookmarkPatch {
    /// Returns true if the patch would not change anything.
    pub fn is_empty(&self) -> bool {
        self.body.is_none() && self.url.is_none()
    }
}

/// Visit counter snapshot for one bookmark.
#[derive(Debug, Clone)]
pub struct VisitStats {
    pub id: i64,
    pub url: String,
    pub short_url: String,
    pub visits: i64,
}
