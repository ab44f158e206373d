//! HTTP middleware for request processing and protection.
//!
//! Provides authentication, rate limiting, and access logging.

pub mod auth;
pub mod rate_limit;
pub mod tracing;

pub use auth::AuthUser;
pub use rate_limit::RateLimitMode;
