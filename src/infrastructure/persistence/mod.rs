//! PostgreSQL repository implementations.
//!
//! Concrete implementations of domain repository traits using SQLx prepared
//! statements. Rows are decoded into private `FromRow` structs and converted
//! into domain entities at the boundary.
//!
//! # Repositories
//!
//! - [`PgUserRepository`] - User storage and lookup
//! - [`PgBookmarkRepository`] - Bookmark storage, short code lookup, and visit counting

pub mod pg_bookmark_repository;
pub mod pg_user_repository;

pub use pg_bookmark_repository::PgBookmarkRepository;
pub use pg_user_repository::PgUserRepository;
