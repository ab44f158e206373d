//! Repository trait definitions for the domain layer.
//!
//! These traits abstract data access following the Repository pattern and are
//! implemented by concrete repositories in the infrastructure layer.
//!
//! - Implementations live in `crate::infrastructure::persistence`
//! - Mock implementations are auto-generated via `mockall` for testing
//!
//! # Available Repositories
//!
//! - [`UserRepository`] - Account storage and lookup
//! - [`BookmarkRepository`] - Bookmark CRUD, short code lookup, and visit counting
//!
//! # Testing
//!
//! See integration tests in `tests/repository_*.rs` for usage examples.

pub mod bookmark_repository;
pub mod user_repository;

pub use bookmark_repository::BookmarkRepository;
pub use user_repository::UserRepository;

#[cfg(test)]
pub use bookmark_repository::MockBookmarkRepository;
#[cfg(test)]
pub use user_repository::MockUserRepository;
