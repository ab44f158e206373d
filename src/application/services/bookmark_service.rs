//! Bookmark management and short link resolution.

use serde_json::json;
use std::sync::Arc;

use crate::domain::entities::{Bookmark, BookmarkPatch, NewBookmark, VisitStats};
use crate::domain::repositories::BookmarkRepository;
use crate::error::AppError;
use crate::utils::code_generator::{generate_code, is_valid_short_code};
use crate::utils::url_normalizer::normalize_url;

/// Number of fresh short codes tried before giving up.
const MAX_CODE_ATTEMPTS: usize = 10;

/// Service for a user's bookmarks and the public redirect lookup.
///
/// Every per-user operation is scoped to the caller's id. A bookmark owned by
/// someone else is reported as not found.
pub struct BookmarkService<R: BookmarkRepository + ?Sized> {
    repository: Arc<R>,
}

impl<R: BookmarkRepository + ?Sized> BookmarkService<R> {
    /// Creates a new bookmark service.
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Creates a bookmark with a freshly generated short code.
    ///
    /// # Code Generation
    ///
    /// Generates a random 12-character code, skips codes already in use, and
    /// retries when the insert itself hits the unique index (a concurrent
    /// request took the same code). Gives up after 10 attempts.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the URL is not a valid http(s) URL.
    /// Returns [`AppError::Internal`] if no unique code could be found or on
    /// database errors.
    pub async fn create(&self, user_id: i64, body: String, url: &str) -> Result<Bookmark, AppError> {
        let url = validate_url(url)?;

        for attempt in 1..=MAX_CODE_ATTEMPTS {
            let short_url = generate_code().map_err(|e| {
                AppError::internal("Failed to generate short code", json!({ "reason": e.to_string() }))
            })?;

            if self.repository.short_url_exists(&short_url).await? {
                tracing::debug!(attempt, "Short code collision, retrying");
                continue;
            }

            let new_bookmark = NewBookmark {
                body: body.clone(),
                url: url.clone(),
                short_url,
                user_id,
            };

            match self.repository.create(new_bookmark).await {
                Ok(bookmark) => {
                    tracing::info!(
                        user_id,
                        bookmark_id = bookmark.id,
                        short_url = %bookmark.short_url,
                        "Bookmark created"
                    );
                    return Ok(bookmark);
                }
                Err(AppError::Conflict { .. }) => {
                    tracing::debug!(attempt, "Short code taken on insert, retrying");
                }
                Err(e) => return Err(e),
            }
        }

        Err(AppError::internal(
            "Failed to generate unique short code",
            json!({ "reason": "Too many collisions" }),
        ))
    }

    /// Returns one page of the user's bookmarks and the user's total count.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn list(
        &self,
        user_id: i64,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<Bookmark>, i64), AppError> {
        tokio::try_join!(
            self.repository.list_for_user(user_id, offset, limit),
            self.repository.count_for_user(user_id)
        )
    }

    /// Retrieves one of the user's bookmarks.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the bookmark does not exist or is not
    /// owned by `user_id`.
    pub async fn get(&self, user_id: i64, id: i64) -> Result<Bookmark, AppError> {
        self.repository
            .find_for_user(id, user_id)
            .await?
            .ok_or_else(|| bookmark_not_found(id))
    }

    /// Partially updates one of the user's bookmarks.
    ///
    /// A new URL is validated and normalized the same way as on creation. An
    /// empty patch returns the bookmark unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the new URL is invalid.
    /// Returns [`AppError::NotFound`] if the bookmark does not exist or is not
    /// owned by `user_id`.
    pub async fn update(
        &self,
        user_id: i64,
        id: i64,
        mut patch: BookmarkPatch,
    ) -> Result<Bookmark, AppError> {
        if patch.is_empty() {
            return self.get(user_id, id).await;
        }

        if let Some(url) = patch.url.as_deref() {
            patch.url = Some(validate_url(url)?);
        }

        let bookmark = self
            .repository
            .update_for_user(id, user_id, patch)
            .await?
            .ok_or_else(|| bookmark_not_found(id))?;

        tracing::info!(user_id, bookmark_id = id, "Bookmark updated");
        Ok(bookmark)
    }

    /// Deletes one of the user's bookmarks.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the bookmark does not exist or is not
    /// owned by `user_id`.
    pub async fn delete(&self, user_id: i64, id: i64) -> Result<(), AppError> {
        if !self.repository.delete_for_user(id, user_id).await? {
            return Err(bookmark_not_found(id));
        }

        tracing::info!(user_id, bookmark_id = id, "Bookmark deleted");
        Ok(())
    }

    /// Returns visit counters for all of the user's bookmarks.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn visit_stats(&self, user_id: i64) -> Result<Vec<VisitStats>, AppError> {
        self.repository.visit_stats(user_id).await
    }

    /// Resolves a short code to its target URL, counting the visit.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no bookmark uses `short_url`.
    pub async fn resolve(&self, short_url: &str) -> Result<String, AppError> {
        let not_found = || AppError::not_found("Short link not found", json!({ "short_url": short_url }));

        if !is_valid_short_code(short_url) {
            return Err(not_found());
        }

        let bookmark = self
            .repository
            .record_visit(short_url)
            .await?
            .ok_or_else(not_found)?;

        tracing::debug!(short_url, visits = bookmark.visits, "Short link resolved");

        Ok(bookmark.url)
    }

    /// Resolves a short code to its target URL without counting a visit.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no bookmark uses `short_url`.
    pub async fn peek(&self, short_url: &str) -> Result<String, AppError> {
        let not_found = || AppError::not_found("Short link not found", json!({ "short_url": short_url }));

        if !is_valid_short_code(short_url) {
            return Err(not_found());
        }

        self.repository
            .find_by_short_url(short_url)
            .await?
            .map(|bookmark| bookmark.url)
            .ok_or_else(not_found)
    }

    /// Checks that the bookmark store is reachable.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the store cannot be queried.
    pub async fn ping(&self) -> Result<(), AppError> {
        self.repository.ping().await
    }
}

fn validate_url(url: &str) -> Result<String, AppError> {
    normalize_url(url).map_err(|e| {
        AppError::bad_request("Invalid URL format", json!({ "field": "url", "reason": e.to_string() }))
    })
}

fn bookmark_not_found(id: i64) -> AppError {
    AppError::not_found("Bookmark not found", json!({ "id": id }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockBookmarkRepository;
    use chrono::Utc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn bookmark(id: i64, user_id: i64, short_url: &str, url: &str) -> Bookmark {
        Bookmark {
            id,
            body: String::new(),
            url: url.to_string(),
            short_url: short_url.to_string(),
            visits: 0,
            user_id,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_create_normalizes_url_and_generates_code() {
        let mut mock_repo = MockBookmarkRepository::new();

        mock_repo
            .expect_short_url_exists()
            .times(1)
            .returning(|_| Ok(false));

        mock_repo
            .expect_create()
            .withf(|b| {
                b.url == "https://example.com/docs"
                    && b.user_id == 1
                    && b.body == "docs"
                    && b.short_url.len() == 12
            })
            .times(1)
            .returning(|b| Ok(bookmark(10, b.user_id, &b.short_url, &b.url)));

        let service = BookmarkService::new(Arc::new(mock_repo));

        let created = service
            .create(1, "docs".to_string(), "HTTPS://EXAMPLE.COM:443/docs#top")
            .await
            .unwrap();

        assert_eq!(created.id, 10);
        assert_eq!(created.url, "https://example.com/docs");
    }

    #[tokio::test]
    async fn test_create_invalid_url() {
        let mut mock_repo = MockBookmarkRepository::new();
        mock_repo.expect_create().times(0);

        let service = BookmarkService::new(Arc::new(mock_repo));

        let err = service
            .create(1, String::new(), "not-a-url")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_create_retries_on_existing_code() {
        let mut mock_repo = MockBookmarkRepository::new();
        let lookups = Arc::new(AtomicUsize::new(0));
        let counter = lookups.clone();

        // First generated code is already taken, second is free.
        mock_repo
            .expect_short_url_exists()
            .times(2)
            .returning(move |_| Ok(counter.fetch_add(1, Ordering::SeqCst) == 0));

        mock_repo
            .expect_create()
            .times(1)
            .returning(|b| Ok(bookmark(1, b.user_id, &b.short_url, &b.url)));

        let service = BookmarkService::new(Arc::new(mock_repo));

        assert!(
            service
                .create(1, String::new(), "https://example.com")
                .await
                .is_ok()
        );
        assert_eq!(lookups.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_create_retries_on_insert_conflict() {
        let mut mock_repo = MockBookmarkRepository::new();
        let inserts = Arc::new(AtomicUsize::new(0));
        let counter = inserts.clone();

        mock_repo.expect_short_url_exists().returning(|_| Ok(false));

        mock_repo.expect_create().times(2).returning(move |b| {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(AppError::conflict("Unique constraint violation", json!({})))
            } else {
                Ok(bookmark(2, b.user_id, &b.short_url, &b.url))
            }
        });

        let service = BookmarkService::new(Arc::new(mock_repo));

        let created = service
            .create(1, String::new(), "https://example.com")
            .await
            .unwrap();

        assert_eq!(created.id, 2);
        assert_eq!(inserts.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_create_gives_up_after_max_attempts() {
        let mut mock_repo = MockBookmarkRepository::new();

        mock_repo
            .expect_short_url_exists()
            .times(MAX_CODE_ATTEMPTS)
            .returning(|_| Ok(true));
        mock_repo.expect_create().times(0);

        let service = BookmarkService::new(Arc::new(mock_repo));

        let err = service
            .create(1, String::new(), "https://example.com")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Internal { .. }));
    }

    #[tokio::test]
    async fn test_get_foreign_bookmark_is_not_found() {
        let mut mock_repo = MockBookmarkRepository::new();

        mock_repo
            .expect_find_for_user()
            .withf(|id, user_id| *id == 5 && *user_id == 2)
            .times(1)
            .returning(|_, _| Ok(None));

        let service = BookmarkService::new(Arc::new(mock_repo));

        let err = service.get(2, 5).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_update_validates_new_url() {
        let mut mock_repo = MockBookmarkRepository::new();
        mock_repo.expect_update_for_user().times(0);

        let service = BookmarkService::new(Arc::new(mock_repo));

        let patch = BookmarkPatch {
            body: None,
            url: Some("ftp://example.com".to_string()),
        };

        let err = service.update(1, 1, patch).await.unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_update_normalizes_url() {
        let mut mock_repo = MockBookmarkRepository::new();

        mock_repo
            .expect_update_for_user()
            .withf(|_, _, patch| patch.url.as_deref() == Some("https://example.com/new"))
            .times(1)
            .returning(|id, user_id, patch| {
                Ok(Some(bookmark(
                    id,
                    user_id,
                    "abcdefabcdef",
                    patch.url.as_deref().unwrap_or_default(),
                )))
            });

        let service = BookmarkService::new(Arc::new(mock_repo));

        let patch = BookmarkPatch {
            body: None,
            url: Some("https://EXAMPLE.com/new".to_string()),
        };

        let updated = service.update(1, 3, patch).await.unwrap();
        assert_eq!(updated.url, "https://example.com/new");
    }

    #[tokio::test]
    async fn test_empty_update_returns_current() {
        let mut mock_repo = MockBookmarkRepository::new();

        mock_repo.expect_update_for_user().times(0);
        mock_repo
            .expect_find_for_user()
            .times(1)
            .returning(|id, user_id| Ok(Some(bookmark(id, user_id, "abcdefabcdef", "https://a.io/"))));

        let service = BookmarkService::new(Arc::new(mock_repo));

        let current = service.update(1, 3, BookmarkPatch::default()).await.unwrap();
        assert_eq!(current.id, 3);
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let mut mock_repo = MockBookmarkRepository::new();
        mock_repo
            .expect_delete_for_user()
            .times(1)
            .returning(|_, _| Ok(false));

        let service = BookmarkService::new(Arc::new(mock_repo));

        assert!(matches!(
            service.delete(1, 99).await,
            Err(AppError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_resolve_known_code() {
        let mut mock_repo = MockBookmarkRepository::new();
        mock_repo
            .expect_record_visit()
            .withf(|code| code == "abcdefabcdef")
            .times(1)
            .returning(|code| {
                let mut b = bookmark(1, 1, code, "https://example.com/target");
                b.visits = 1;
                Ok(Some(b))
            });

        let service = BookmarkService::new(Arc::new(mock_repo));

        assert_eq!(
            service.resolve("abcdefabcdef").await.unwrap(),
            "https://example.com/target"
        );
    }

    #[tokio::test]
    async fn test_resolve_unknown_code() {
        let mut mock_repo = MockBookmarkRepository::new();
        mock_repo
            .expect_record_visit()
            .times(1)
            .returning(|_| Ok(None));

        let service = BookmarkService::new(Arc::new(mock_repo));

        assert!(matches!(
            service.resolve("missing").await,
            Err(AppError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_resolve_malformed_code_skips_database() {
        let mut mock_repo = MockBookmarkRepository::new();
        mock_repo.expect_record_visit().times(0);

        let service = BookmarkService::new(Arc::new(mock_repo));

        assert!(matches!(
            service.resolve("not.a.code").await,
            Err(AppError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_peek_does_not_record_visit() {
        let mut mock_repo = MockBookmarkRepository::new();
        mock_repo.expect_record_visit().times(0);
        mock_repo
            .expect_find_by_short_url()
            .withf(|code| code == "abcdefabcdef")
            .times(1)
            .returning(|code| Ok(Some(bookmark(1, 1, code, "https://example.com/target"))));

        let service = BookmarkService::new(Arc::new(mock_repo));

        assert_eq!(
            service.peek("abcdefabcdef").await.unwrap(),
            "https://example.com/target"
        );
    }
}
