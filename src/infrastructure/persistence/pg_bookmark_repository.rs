//! PostgreSQL implementation of bookmark repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{Bookmark, BookmarkPatch, NewBookmark, VisitStats};
use crate::domain::repositories::BookmarkRepository;
use crate::error::AppError;

/// PostgreSQL repository for bookmark storage and retrieval.
///
/// Uses SQLx prepared statements for SQL injection protection. Every per-user
/// query filters on `user_id` so ownership is enforced in SQL.
pub struct PgBookmarkRepository {
    pool: Arc<PgPool>,
}

impl PgBookmarkRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct BookmarkRow {
    id: i64,
    body: String,
    url: String,
    short_url: String,
    visits: i64,
    user_id: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<BookmarkRow> for Bookmark {
    fn from(r: BookmarkRow) -> Self {
        Bookmark {
            id: r.id,
            body: r.body,
            url: r.url,
            short_url: r.short_url,
            visits: r.visits,
            user_id: r.user_id,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct VisitStatsRow {
    id: i64,
    url: String,
    short_url: String,
    visits: i64,
}

#[async_trait]
impl BookmarkRepository for PgBookmarkRepository {
    async fn create(&self, new_bookmark: NewBookmark) -> Result<Bookmark, AppError> {
        let row = sqlx::query_as::<_, BookmarkRow>(
            r#"
            INSERT INTO bookmarks (body, url, short_url, user_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, body, url, short_url, visits, user_id, created_at, updated_at
            "#,
        )
        .bind(&new_bookmark.body)
        .bind(&new_bookmark.url)
        .bind(&new_bookmark.short_url)
        .bind(new_bookmark.user_id)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(row.into())
    }

    async fn short_url_exists(&self, short_url: &str) -> Result<bool, AppError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM bookmarks WHERE short_url = $1)")
                .bind(short_url)
                .fetch_one(self.pool.as_ref())
                .await?;

        Ok(exists)
    }

    async fn find_for_user(&self, id: i64, user_id: i64) -> Result<Option<Bookmark>, AppError> {
        let row = sqlx::query_as::<_, BookmarkRow>(
            r#"
            SELECT id, body, url, short_url, visits, user_id, created_at, updated_at
            FROM bookmarks
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Bookmark::from))
    }

    async fn list_for_user(
        &self,
        user_id: i64,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Bookmark>, AppError> {
        let rows = sqlx::query_as::<_, BookmarkRow>(
            r#"
            SELECT id, body, url, short_url, visits, user_id, created_at, updated_at
            FROM bookmarks
            WHERE user_id = $1
            ORDER BY created_at DESC, id DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Bookmark::from).collect())
    }

    async fn count_for_user(&self, user_id: i64) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM bookmarks WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }

    async fn update_for_user(
        &self,
        id: i64,
        user_id: i64,
        patch: BookmarkPatch,
    ) -> Result<Option<Bookmark>, AppError> {
        let row = sqlx::query_as::<_, BookmarkRow>(
            r#"
            UPDATE bookmarks
            SET body = COALESCE($3, body),
                url = COALESCE($4, url),
                updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING id, body, url, short_url, visits, user_id, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(patch.body)
        .bind(patch.url)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Bookmark::from))
    }

    async fn delete_for_user(&self, id: i64, user_id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM bookmarks WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn find_by_short_url(&self, short_url: &str) -> Result<Option<Bookmark>, AppError> {
        let row = sqlx::query_as::<_, BookmarkRow>(
            r#"
            SELECT id, body, url, short_url, visits, user_id, created_at, updated_at
            FROM bookmarks
            WHERE short_url = $1
            "#,
        )
        .bind(short_url)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Bookmark::from))
    }

    async fn record_visit(&self, short_url: &str) -> Result<Option<Bookmark>, AppError> {
        // Single statement: concurrent redirects cannot lose increments.
        let row = sqlx::query_as::<_, BookmarkRow>(
            r#"
            UPDATE bookmarks
            SET visits = visits + 1
            WHERE short_url = $1
            RETURNING id, body, url, short_url, visits, user_id, created_at, updated_at
            "#,
        )
        .bind(short_url)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Bookmark::from))
    }

    async fn visit_stats(&self, user_id: i64) -> Result<Vec<VisitStats>, AppError> {
        let rows = sqlx::query_as::<_, VisitStatsRow>(
            r#"
            SELECT id, url, short_url, visits
            FROM bookmarks
            WHERE user_id = $1
            ORDER BY visits DESC, id ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| VisitStats {
                id: r.id,
                url: r.url,
                short_url: r.short_url,
                visits: r.visits,
            })
            .collect())
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(self.pool.as_ref())
            .await?;

        Ok(())
    }
}
