//! Core domain entities representing the business data model.
//!
//! # Entity Types
//!
//! - [`User`] - A registered account owning bookmarks
//! - [`Bookmark`] - A saved URL with its generated short code and visit counter
//!
//! Entities follow the "New Type" pattern with separate structs for creation
//! (`NewUser`, `NewBookmark`) and partial updates (`BookmarkPatch`).

pub mod bookmark;
pub mod user;

pub use bookmark::{Bookmark, BookmarkPatch, NewBookmark, VisitStats};
pub use user::{NewUser, User};
