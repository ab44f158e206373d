//! DTOs for registration, login and token refresh.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::application::services::TokenPair;
use crate::domain::entities::User;

/// Value of `token_type` in token responses.
pub const TOKEN_TYPE: &str = "Bearer";

/// Credentials for `POST /register`.
///
/// Only size limits are checked here. Address format and password strength are
/// enforced by [`AuthService::register`](crate::application::services::AuthService::register)
/// after the email is normalized.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 254, message = "Email must be 1-254 characters"))]
    pub email: String,

    #[validate(length(min = 1, max = 128, message = "Password must be 1-128 characters"))]
    pub password: String,
}

/// Credentials for `POST /login`.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 254))]
    pub email: String,

    #[validate(length(min = 1, max = 128))]
    pub password: String,
}

/// Public view of a user. Never includes the password hash.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Body of `POST /register` and `GET /me`.
#[derive(Debug, Serialize)]
pub struct UserEnvelope {
    pub user: UserResponse,
}

impl From<User> for UserEnvelope {
    fn from(user: User) -> Self {
        Self { user: user.into() }
    }
}

/// Body of `POST /login`.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user: UserResponse,
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: &'static str,
}

impl LoginResponse {
    pub fn new(user: User, tokens: TokenPair) -> Self {
        Self {
            user: user.into(),
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            token_type: TOKEN_TYPE,
        }
    }
}

/// Body of `POST /token/refresh`.
#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub access_token: String,
    pub token_type: &'static str,
}

impl RefreshResponse {
    pub fn new(access_token: String) -> Self {
        Self {
            access_token,
            token_type: TOKEN_TYPE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_response_omits_password_hash() {
        let now = Utc::now();
        let user = User {
            id: 7,
            email: "alice@example.com".to_string(),
            password_hash: "$argon2id$v=19$secret".to_string(),
            created_at: now,
            updated_at: now,
        };

        let json = serde_json::to_value(UserEnvelope::from(user)).unwrap();

        assert_eq!(json["user"]["id"], 7);
        assert_eq!(json["user"]["email"], "alice@example.com");
        assert!(json["user"].get("password_hash").is_none());
    }

    #[test]
    fn test_register_request_rejects_empty_fields() {
        let req = RegisterRequest {
            email: String::new(),
            password: String::new(),
        };

        let errors = req.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("password"));
    }
}
