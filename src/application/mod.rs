//! Application layer services implementing business logic.
//!
//! Services coordinate repository calls, validation, and business rules, and
//! give HTTP handlers a small typed API.
//!
//! # Available Services
//!
//! - [`services::auth_service::AuthService`] - Registration, login, and token refresh
//! - [`services::bookmark_service::BookmarkService`] - Bookmark CRUD and short link resolution
//! - [`services::token_service::TokenService`] - Signing and verifying access/refresh tokens

pub mod services;
