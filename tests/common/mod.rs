#![allow(dead_code)]

use async_trait::async_trait;
use axum_test::TestServer;
use bookmarks_api::api::middleware::RateLimitMode;
use bookmarks_api::application::services::TokenService;
use bookmarks_api::domain::entities::{
    Bookmark, BookmarkPatch, NewBookmark, NewUser, User, VisitStats,
};
use bookmarks_api::domain::repositories::{BookmarkRepository, UserRepository};
use bookmarks_api::error::AppError;
use bookmarks_api::routes::router;
use bookmarks_api::state::AppState;
use chrono::{Duration, Utc};
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};

pub const TEST_SECRET: &[u8] = b"integration-test-secret-key";
pub const TEST_PASSWORD: &str = "correct-horse";

/// In-memory stand-in for `PgUserRepository`.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<Vec<User>>,
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, new_user: NewUser) -> Result<User, AppError> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == new_user.email) {
            return Err(AppError::conflict("Unique constraint violation", json!({})));
        }

        let now = Utc::now();
        let user = User {
            id: users.iter().map(|u| u.id).max().unwrap_or(0) + 1,
            email: new_user.email,
            password_hash: new_user.password_hash,
            created_at: now,
            updated_at: now,
        };
        users.push(user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(self.users.lock().unwrap().iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError> {
        Ok(self.users.lock().unwrap().iter().find(|u| u.id == id).cloned())
    }

    async fn list(&self) -> Result<Vec<User>, AppError> {
        Ok(self.users.lock().unwrap().clone())
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let mut users = self.users.lock().unwrap();
        let before = users.len();
        users.retain(|u| u.id != id);
        Ok(users.len() != before)
    }
}

/// In-memory stand-in for `PgBookmarkRepository`.
#[derive(Default)]
pub struct InMemoryBookmarkRepository {
    bookmarks: Mutex<Vec<Bookmark>>,
}

impl InMemoryBookmarkRepository {
    pub fn all(&self) -> Vec<Bookmark> {
        self.bookmarks.lock().unwrap().clone()
    }
}

#[async_trait]
impl BookmarkRepository for InMemoryBookmarkRepository {
    async fn create(&self, new_bookmark: NewBookmark) -> Result<Bookmark, AppError> {
        let mut bookmarks = self.bookmarks.lock().unwrap();
        if bookmarks.iter().any(|b| b.short_url == new_bookmark.short_url) {
            return Err(AppError::conflict("Unique constraint violation", json!({})));
        }

        let now = Utc::now();
        let bookmark = Bookmark {
            id: bookmarks.iter().map(|b| b.id).max().unwrap_or(0) + 1,
            body: new_bookmark.body,
            url: new_bookmark.url,
            short_url: new_bookmark.short_url,
            visits: 0,
            user_id: new_bookmark.user_id,
            created_at: now,
            updated_at: now,
        };
        bookmarks.push(bookmark.clone());
        Ok(bookmark)
    }

    async fn short_url_exists(&self, short_url: &str) -> Result<bool, AppError> {
        Ok(self.bookmarks.lock().unwrap().iter().any(|b| b.short_url == short_url))
    }

    async fn find_for_user(&self, id: i64, user_id: i64) -> Result<Option<Bookmark>, AppError> {
        Ok(self
            .bookmarks
            .lock()
            .unwrap()
            .iter()
            .find(|b| b.id == id && b.user_id == user_id)
            .cloned())
    }

    async fn list_for_user(
        &self,
        user_id: i64,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Bookmark>, AppError> {
        let mut owned: Vec<Bookmark> = self
            .bookmarks
            .lock()
            .unwrap()
            .iter()
            .filter(|b| b.user_id == user_id)
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        Ok(owned
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }

    async fn count_for_user(&self, user_id: i64) -> Result<i64, AppError> {
        Ok(self
            .bookmarks
            .lock()
            .unwrap()
            .iter()
            .filter(|b| b.user_id == user_id)
            .count() as i64)
    }

    async fn update_for_user(
        &self,
        id: i64,
        user_id: i64,
        patch: BookmarkPatch,
    ) -> Result<Option<Bookmark>, AppError> {
        let mut bookmarks = self.bookmarks.lock().unwrap();
        let Some(bookmark) = bookmarks
            .iter_mut()
            .find(|b| b.id == id && b.user_id == user_id)
        else {
            return Ok(None);
        };

        if let Some(body) = patch.body {
            bookmark.body = body;
        }
        if let Some(url) = patch.url {
            bookmark.url = url;
        }
        bookmark.updated_at = Utc::now();

        Ok(Some(bookmark.clone()))
    }

    async fn delete_for_user(&self, id: i64, user_id: i64) -> Result<bool, AppError> {
        let mut bookmarks = self.bookmarks.lock().unwrap();
        let before = bookmarks.len();
        bookmarks.retain(|b| !(b.id == id && b.user_id == user_id));
        Ok(bookmarks.len() != before)
    }

    async fn find_by_short_url(&self, short_url: &str) -> Result<Option<Bookmark>, AppError> {
        Ok(self
            .bookmarks
            .lock()
            .unwrap()
            .iter()
            .find(|b| b.short_url == short_url)
            .cloned())
    }

    async fn record_visit(&self, short_url: &str) -> Result<Option<Bookmark>, AppError> {
        let mut bookmarks = self.bookmarks.lock().unwrap();
        Ok(bookmarks
            .iter_mut()
            .find(|b| b.short_url == short_url)
            .map(|b| {
                b.visits += 1;
                b.clone()
            }))
    }

    async fn visit_stats(&self, user_id: i64) -> Result<Vec<VisitStats>, AppError> {
        let mut stats: Vec<VisitStats> = self
            .bookmarks
            .lock()
            .unwrap()
            .iter()
            .filter(|b| b.user_id == user_id)
            .map(|b| VisitStats {
                id: b.id,
                url: b.url.clone(),
                short_url: b.short_url.clone(),
                visits: b.visits,
            })
            .collect();
        stats.sort_by(|a, b| b.visits.cmp(&a.visits).then(a.id.cmp(&b.id)));
        Ok(stats)
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}

/// A bookmark store whose every call fails, for health and error-path tests.
pub struct UnavailableBookmarkRepository;

fn unavailable() -> AppError {
    AppError::internal("Database error", json!({ "reason": "connection refused" }))
}

#[async_trait]
impl BookmarkRepository for UnavailableBookmarkRepository {
    async fn create(&self, _: NewBookmark) -> Result<Bookmark, AppError> {
        Err(unavailable())
    }
    async fn short_url_exists(&self, _: &str) -> Result<bool, AppError> {
        Err(unavailable())
    }
    async fn find_for_user(&self, _: i64, _: i64) -> Result<Option<Bookmark>, AppError> {
        Err(unavailable())
    }
    async fn list_for_user(&self, _: i64, _: i64, _: i64) -> Result<Vec<Bookmark>, AppError> {
        Err(unavailable())
    }
    async fn count_for_user(&self, _: i64) -> Result<i64, AppError> {
        Err(unavailable())
    }
    async fn update_for_user(
        &self,
        _: i64,
        _: i64,
        _: BookmarkPatch,
    ) -> Result<Option<Bookmark>, AppError> {
        Err(unavailable())
    }
    async fn delete_for_user(&self, _: i64, _: i64) -> Result<bool, AppError> {
        Err(unavailable())
    }
    async fn find_by_short_url(&self, _: &str) -> Result<Option<Bookmark>, AppError> {
        Err(unavailable())
    }
    async fn record_visit(&self, _: &str) -> Result<Option<Bookmark>, AppError> {
        Err(unavailable())
    }
    async fn visit_stats(&self, _: i64) -> Result<Vec<VisitStats>, AppError> {
        Err(unavailable())
    }
    async fn ping(&self) -> Result<(), AppError> {
        Err(unavailable())
    }
}

pub fn token_service() -> Arc<TokenService> {
    Arc::new(TokenService::new(
        TEST_SECRET,
        Duration::minutes(15),
        Duration::days(1),
    ))
}

pub struct TestApp {
    pub server: TestServer,
    pub users: Arc<InMemoryUserRepository>,
    pub bookmarks: Arc<InMemoryBookmarkRepository>,
}

/// Full application router over in-memory repositories, without rate limiting.
pub fn make_app() -> TestApp {
    let users = Arc::new(InMemoryUserRepository::default());
    let bookmarks = Arc::new(InMemoryBookmarkRepository::default());
    let state = AppState::new(users.clone(), bookmarks.clone(), token_service());

    TestApp {
        server: make_server_with_state(state),
        users,
        bookmarks,
    }
}

pub fn make_server_with_state(state: AppState) -> TestServer {
    TestServer::new(router(state, RateLimitMode::Disabled)).unwrap()
}

/// Registers `email` and returns its access token.
pub async fn register_and_login(server: &TestServer, email: &str) -> String {
    login_tokens(server, email).await.0
}

/// Registers `email` and returns `(access_token, refresh_token)`.
pub async fn login_tokens(server: &TestServer, email: &str) -> (String, String) {
    server
        .post("/register")
        .json(&json!({ "email": email, "password": TEST_PASSWORD }))
        .await
        .assert_status(axum::http::StatusCode::CREATED);

    let body = server
        .post("/login")
        .json(&json!({ "email": email, "password": TEST_PASSWORD }))
        .await
        .json::<Value>();

    (
        body["access_token"].as_str().unwrap().to_string(),
        body["refresh_token"].as_str().unwrap().to_string(),
    )
}

/// Creates a bookmark through the API and returns the response body.
pub async fn create_bookmark(server: &TestServer, token: &str, url: &str) -> Value {
    let response = server
        .post("/bookmarks")
        .authorization_bearer(token)
        .json(&json!({ "url": url, "body": "saved" }))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);
    response.json::<Value>()
}
