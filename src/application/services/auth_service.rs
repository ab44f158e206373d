//! Account registration, login, and token refresh.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use serde_json::json;
use std::sync::Arc;
use validator::ValidateEmail;

use crate::application::services::token_service::{TokenKind, TokenPair, TokenService};
use crate::domain::entities::{NewUser, User};
use crate::domain::repositories::UserRepository;
use crate::error::AppError;

/// Shortest password accepted at registration.
pub const MIN_PASSWORD_LENGTH: usize = 6;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Service for user accounts and credential checks.
///
/// Passwords are hashed with Argon2id on the blocking thread pool; the raw
/// password never reaches the repository.
pub struct AuthService<R: UserRepository + ?Sized> {
    repository: Arc<R>,
    tokens: Arc<TokenService>,
}

impl<R: UserRepository + ?Sized> AuthService<R> {
    /// Creates a new authentication service.
    pub fn new(repository: Arc<R>, tokens: Arc<TokenService>) -> Self {
        Self { repository, tokens }
    }

    /// Registers a new user.
    ///
    /// The email is trimmed and lowercased before it is checked and stored.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if:
    /// - The email is malformed
    /// - The password is shorter than [`MIN_PASSWORD_LENGTH`]
    /// - The email is already registered
    ///
    /// Returns [`AppError::Internal`] on hashing or database errors.
    pub async fn register(&self, email: &str, password: &str) -> Result<User, AppError> {
        let email = normalize_email(email);

        if !email.validate_email() {
            return Err(AppError::bad_request(
                "Email is not valid",
                json!({ "field": "email" }),
            ));
        }

        if password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(AppError::bad_request(
                format!("Password must be at least {MIN_PASSWORD_LENGTH} characters"),
                json!({ "field": "password" }),
            ));
        }

        if self.repository.find_by_email(&email).await?.is_some() {
            tracing::warn!(%email, "Registration rejected: email already registered");
            return Err(email_taken(&email));
        }

        let password_hash = hash_password(password.to_owned()).await?;

        let new_user = NewUser {
            email: email.clone(),
            password_hash,
        };

        match self.repository.create(new_user).await {
            Ok(user) => {
                tracing::info!(user_id = user.id, "User registered");
                Ok(user)
            }
            // Lost a race with a concurrent registration of the same address.
            Err(AppError::Conflict { .. }) => Err(email_taken(&email)),
            Err(e) => Err(e),
        }
    }

    /// Checks credentials and issues an access/refresh pair.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] if the email is unknown or the
    /// password does not match. Both cases share one message.
    pub async fn login(&self, email: &str, password: &str) -> Result<(User, TokenPair), AppError> {
        let email = normalize_email(email);

        let Some(user) = self.repository.find_by_email(&email).await? else {
            tracing::warn!("Login failed: user not found");
            return Err(AppError::unauthorized(INVALID_CREDENTIALS, json!({})));
        };

        if !verify_password(password.to_owned(), user.password_hash.clone()).await? {
            tracing::warn!(user_id = user.id, "Login failed: wrong password");
            return Err(AppError::unauthorized(INVALID_CREDENTIALS, json!({})));
        }

        let tokens = self.tokens.issue_pair(user.id)?;
        tracing::info!(user_id = user.id, "User logged in");

        Ok((user, tokens))
    }

    /// Issues a new access token from a valid refresh token.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] if the token is expired, invalid, not a
    /// refresh token, or belongs to a user that no longer exists.
    pub async fn refresh(&self, refresh_token: &str) -> Result<String, AppError> {
        let claims = self.tokens.verify(refresh_token, TokenKind::Refresh)?;
        self.ensure_active(claims.sub).await?;

        self.tokens.issue(claims.sub, TokenKind::Access)
    }

    /// Checks that the subject of a verified token still has an account.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] with message `"Invalid token"` if the
    /// user has been deleted since the token was issued.
    pub async fn ensure_active(&self, user_id: i64) -> Result<(), AppError> {
        if self.repository.find_by_id(user_id).await?.is_none() {
            return Err(AppError::unauthorized(
                "Invalid token",
                json!({ "reason": "user no longer exists" }),
            ));
        }

        Ok(())
    }

    /// Returns the user with the given id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the user does not exist.
    pub async fn current_user(&self, user_id: i64) -> Result<User, AppError> {
        self.repository
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found", json!({ "id": user_id })))
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn email_taken(email: &str) -> AppError {
    AppError::bad_request(
        "Email is already registered",
        json!({ "field": "email", "email": email }),
    )
}

async fn hash_password(password: String) -> Result<String, AppError> {
    tokio::task::spawn_blocking(move || {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
    })
    .await
    .map_err(|e| AppError::internal("Password hashing task failed", json!({ "reason": e.to_string() })))?
    .map_err(|e| AppError::internal("Failed to hash password", json!({ "reason": e.to_string() })))
}

async fn verify_password(password: String, password_hash: String) -> Result<bool, AppError> {
    tokio::task::spawn_blocking(move || {
        let parsed = PasswordHash::new(&password_hash)?;
        Ok::<_, argon2::password_hash::Error>(
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok(),
        )
    })
    .await
    .map_err(|e| AppError::internal("Password verification task failed", json!({ "reason": e.to_string() })))?
    .map_err(|e| AppError::internal("Stored password hash is malformed", json!({ "reason": e.to_string() })))
}
