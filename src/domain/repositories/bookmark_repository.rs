//! Repository trait for bookmark data access.

use crate::domain::entities::{Bookmark, BookmarkPatch, NewBookmark, VisitStats};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for managing bookmarks.
///
/// All per-user operations take the owner's id and never touch rows owned by
/// someone else; a foreign bookmark is indistinguishable from a missing one.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgBookmarkRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_bookmark.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookmarkRepository: Send + Sync {
    /// Creates a new bookmark.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the short code is already taken.
    /// Returns [`AppError::Internal`] on database errors.
    async fn create(&self, new_bookmark: NewBookmark) -> Result<Bookmark, AppError>;

    /// Returns true if any bookmark already uses `short_url`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn short_url_exists(&self, short_url: &str) -> Result<bool, AppError>;

    /// Finds a bookmark by id, restricted to the given owner.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_for_user(&self, id: i64, user_id: i64) -> Result<Option<Bookmark>, AppError>;

    /// Lists a user's bookmarks, newest first.
    ///
    /// # Arguments
    ///
    /// - `offset` - Number of rows to skip
    /// - `limit` - Maximum number of rows to return
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn list_for_user(
        &self,
        user_id: i64,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Bookmark>, AppError>;

    /// Counts a user's bookmarks.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn count_for_user(&self, user_id: i64) -> Result<i64, AppError>;

    /// Partially updates a bookmark and refreshes `updated_at`.
    ///
    /// Returns `Ok(None)` if no bookmark matches `id` + `user_id`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn update_for_user(
        &self,
        id: i64,
        user_id: i64,
        patch: BookmarkPatch,
    ) -> Result<Option<Bookmark>, AppError>;

    /// Deletes a bookmark.
    ///
    /// Returns `Ok(true)` if the bookmark was found and deleted.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn delete_for_user(&self, id: i64, user_id: i64) -> Result<bool, AppError>;

    /// Finds the bookmark with `short_url` without touching its counter.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_short_url(&self, short_url: &str) -> Result<Option<Bookmark>, AppError>;

    /// Atomically increments the visit counter of the bookmark with `short_url`.
    ///
    /// Returns the updated bookmark, or `Ok(None)` if the code is unknown.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn record_visit(&self, short_url: &str) -> Result<Option<Bookmark>, AppError>;

    /// Returns visit counters for all of a user's bookmarks, most visited first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn visit_stats(&self, user_id: i64) -> Result<Vec<VisitStats>, AppError>;

    /// Checks that the backing store is reachable.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the store cannot be queried.
    async fn ping(&self) -> Result<(), AppError>;
}
