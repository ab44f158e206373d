//! Business logic services for the application layer.

pub mod auth_service;
pub mod bookmark_service;
pub mod token_service;

pub use auth_service::AuthService;
pub use bookmark_service::BookmarkService;
pub use token_service::{Claims, TokenKind, TokenPair, TokenService};
