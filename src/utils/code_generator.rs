//! Short code generation utilities.
//!
//! Short codes are random, URL-safe, and fixed length. Uniqueness is not
//! guaranteed here; callers retry on collision.

use base64::Engine as _;
use regex::Regex;
use std::sync::LazyLock;

/// Length of random bytes before base64 encoding.
const CODE_LENGTH_BYTES: usize = 9;

/// Length of a generated short code (9 bytes of base64 without padding).
pub const CODE_LENGTH: usize = 12;

/// Accepts anything a generated code could look like, with some slack for
/// codes minted under a different length.
static SHORT_CODE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]{1,32}$").expect("static regex is valid"));

/// Errors raised while generating a short code.
#[derive(Debug, thiserror::Error)]
#[error("System random number generator failed: {0}")]
pub struct CodeGenerationError(String);

/// Generates a cryptographically secure random short code.
///
/// Uses `getrandom` for entropy and encodes the result as URL-safe base64
/// without padding, producing a 12-character code.
///
/// # Errors
///
/// Returns [`CodeGenerationError`] if the OS entropy source fails.
///
/// # Examples
///
/// ```ignore
/// let code = generate_code()?;
/// assert_eq!(code.len(), 12);
/// ```
pub fn generate_code() -> Result<String, CodeGenerationError> {
    let mut buffer = [0u8; CODE_LENGTH_BYTES];

    getrandom::fill(&mut buffer).map_err(|e| CodeGenerationError(e.to_string()))?;

    Ok(base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(buffer))
}

/// Returns true if `code` has the shape of a short code.
///
/// Used by the redirect path to reject junk before touching the database.
pub fn is_valid_short_code(code: &str) -> bool {
    SHORT_CODE_REGEX.is_match(code)
}
