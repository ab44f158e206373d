//! Signed access and refresh tokens.

use chrono::{Duration, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt;

use crate::error::AppError;

/// Which half of a token pair a JWT is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Access => f.write_str("access"),
            TokenKind::Refresh => f.write_str("refresh"),
        }
    }
}

/// JWT claims carried by both token kinds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: i64,
    pub kind: TokenKind,
    pub iat: i64,
    pub exp: i64,
}

/// Freshly issued access and refresh tokens.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Issues and verifies HS256 tokens signed with the server secret.
///
/// Expiry is checked with zero leeway. Verification failures map to
/// [`AppError::Unauthorized`] with a message telling expired tokens apart from
/// otherwise invalid ones.
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenService {
    /// Creates a token service.
    ///
    /// # Arguments
    ///
    /// - `secret` - HMAC key used to sign and verify tokens
    /// - `access_ttl` - lifetime of access tokens
    /// - `refresh_ttl` - lifetime of refresh tokens
    pub fn new(secret: &[u8], access_ttl: Duration, refresh_ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            access_ttl,
            refresh_ttl,
        }
    }

    /// Signs a token of the given kind for `user_id`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if encoding fails or the lifetime pushes
    /// `exp` past the representable date range.
    pub fn issue(&self, user_id: i64, kind: TokenKind) -> Result<String, AppError> {
        let now = Utc::now();
        let ttl = match kind {
            TokenKind::Access => self.access_ttl,
            TokenKind::Refresh => self.refresh_ttl,
        };

        let exp = now.checked_add_signed(ttl).ok_or_else(|| {
            AppError::internal(
                "Token lifetime out of range",
                json!({ "kind": kind.to_string(), "ttl_seconds": ttl.num_seconds() }),
            )
        })?;

        let claims = Claims {
            sub: user_id,
            kind,
            iat: now.timestamp(),
            exp: exp.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding).map_err(|e| {
            AppError::internal("Failed to issue token", json!({ "reason": e.to_string() }))
        })
    }

    /// Signs an access/refresh pair for `user_id`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if encoding fails.
    pub fn issue_pair(&self, user_id: i64) -> Result<TokenPair, AppError> {
        Ok(TokenPair {
            access_token: self.issue(user_id, TokenKind::Access)?,
            refresh_token: self.issue(user_id, TokenKind::Refresh)?,
        })
    }

    /// Verifies a token and checks that it is of the `expected` kind.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] with message:
    /// - `"Token has expired"` when `exp` is in the past
    /// - `"Invalid token"` for bad signatures, malformed input, or a kind mismatch
    pub fn verify(&self, token: &str, expected: TokenKind) -> Result<Claims, AppError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => {
                    AppError::unauthorized("Token has expired", json!({ "reason": "expired" }))
                }
                _ => AppError::unauthorized("Invalid token", json!({ "reason": e.to_string() })),
            }
        })?;

        if data.claims.kind != expected {
            return Err(AppError::unauthorized(
                "Invalid token",
                json!({ "reason": format!("expected {} token, got {}", expected, data.claims.kind) }),
            ));
        }

        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        TokenService::new(
            b"test-secret-key-0123456789",
            Duration::minutes(15),
            Duration::days(1),
        )
    }

    fn message(err: AppError) -> String {
        match err {
            AppError::Unauthorized { message, .. } => message,
            other => panic!("expected Unauthorized, got {other:?}"),
        }
    }

    #[test]
    fn test_issue_and_verify_access() {
        let svc = service();
        let token = svc.issue(42, TokenKind::Access).unwrap();

        let claims = svc.verify(&token, TokenKind::Access).unwrap();
        assert_eq!(claims.sub, 42);
        assert_eq!(claims.kind, TokenKind::Access);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_pair_kinds_are_not_interchangeable() {
        let svc = service();
        let pair = svc.issue_pair(1).unwrap();

        assert!(svc.verify(&pair.refresh_token, TokenKind::Refresh).is_ok());
        assert_eq!(
            message(svc.verify(&pair.refresh_token, TokenKind::Access).unwrap_err()),
            "Invalid token"
        );
        assert_eq!(
            message(svc.verify(&pair.access_token, TokenKind::Refresh).unwrap_err()),
            "Invalid token"
        );
    }

    #[test]
    fn test_expired_token_is_reported_as_expired() {
        let svc = TokenService::new(
            b"test-secret-key-0123456789",
            Duration::minutes(-5),
            Duration::days(1),
        );
        let token = svc.issue(1, TokenKind::Access).unwrap();

        assert_eq!(
            message(svc.verify(&token, TokenKind::Access).unwrap_err()),
            "Token has expired"
        );
    }

    #[test]
    fn test_oversized_lifetime_is_an_error() {
        let svc = TokenService::new(
            b"test-secret-key-0123456789",
            Duration::seconds(10_000_000_000_000),
            Duration::MAX,
        );

        assert!(matches!(
            svc.issue(1, TokenKind::Access),
            Err(AppError::Internal { .. })
        ));
        assert!(matches!(svc.issue_pair(1), Err(AppError::Internal { .. })));
    }

    #[test]
    fn test_wrong_secret_is_invalid() {
        let token = service().issue(1, TokenKind::Access).unwrap();
        let other = TokenService::new(
            b"another-secret-key-987654",
            Duration::minutes(15),
            Duration::days(1),
        );

        assert_eq!(
            message(other.verify(&token, TokenKind::Access).unwrap_err()),
            "Invalid token"
        );
    }

    #[test]
    fn test_garbage_is_invalid() {
        assert_eq!(
            message(service().verify("not.a.jwt", TokenKind::Access).unwrap_err()),
            "Invalid token"
        );
    }
}
