//! Shared application state injected into every handler.

use chrono::Duration;
use sqlx::PgPool;
use std::sync::Arc;

use crate::application::services::{AuthService, BookmarkService, TokenService};
use crate::config::Config;
use crate::domain::repositories::{BookmarkRepository, UserRepository};
use crate::infrastructure::persistence::{PgBookmarkRepository, PgUserRepository};

/// Services shared by all request handlers.
///
/// Repositories sit behind trait objects so the same router can run against
/// PostgreSQL in production and against in-memory stores in tests.
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<AuthService<dyn UserRepository>>,
    pub bookmark_service: Arc<BookmarkService<dyn BookmarkRepository>>,
    pub token_service: Arc<TokenService>,
}

impl AppState {
    /// Wires services on top of the given repositories.
    pub fn new(
        users: Arc<dyn UserRepository>,
        bookmarks: Arc<dyn BookmarkRepository>,
        token_service: Arc<TokenService>,
    ) -> Self {
        Self {
            auth_service: Arc::new(AuthService::new(users, token_service.clone())),
            bookmark_service: Arc::new(BookmarkService::new(bookmarks)),
            token_service,
        }
    }

    /// Builds the production state backed by PostgreSQL repositories.
    pub fn from_pool(pool: PgPool, config: &Config) -> Self {
        let pool = Arc::new(pool);

        let token_service = Arc::new(TokenService::new(
            config.secret_key.as_bytes(),
            ttl(config.access_token_ttl_seconds),
            ttl(config.refresh_token_ttl_seconds),
        ));

        Self::new(
            Arc::new(PgUserRepository::new(pool.clone())),
            Arc::new(PgBookmarkRepository::new(pool)),
            token_service,
        )
    }
}

fn ttl(seconds: i64) -> Duration {
    Duration::try_seconds(seconds).unwrap_or(Duration::MAX)
}
