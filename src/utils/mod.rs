//! Utility functions for short code generation and URL processing.
//!
//! - [`code_generator`] - Short code generation and shape checks
//! - [`url_normalizer`] - Bookmark URL validation and normalization

pub mod code_generator;
pub mod url_normalizer;
