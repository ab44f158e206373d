//! Bearer token authentication middleware.

use axum::{
    extract::{FromRequestParts, Request, State},
    middleware::Next,
    response::Response,
};
use axum_auth::AuthBearer;
use serde_json::json;

use crate::application::services::TokenKind;
use crate::{error::AppError, state::AppState};

/// Identity of the caller, inserted into request extensions by [`layer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub id: i64,
}

/// Extracts the bearer token from the `Authorization` header.
pub(crate) async fn bearer_token(parts: &mut axum::http::request::Parts) -> Result<String, AppError> {
    let AuthBearer(token) = AuthBearer::from_request_parts(parts, &())
        .await
        .map_err(|_| {
            AppError::unauthorized(
                "Missing bearer token",
                json!({ "reason": "Authorization header is missing or invalid" }),
            )
        })?;

    Ok(token)
}

/// Authenticates requests using access tokens from the Authorization header.
///
/// # Header Format
///
/// ```text
/// Authorization: Bearer <access_token>
/// ```
///
/// On success the caller's [`AuthUser`] is available to handlers through
/// `Extension<AuthUser>`.
///
/// # Errors
///
/// Returns `401 Unauthorized` with message:
/// - `"Missing bearer token"` if the header is absent or malformed
/// - `"Token has expired"` if the token is past its `exp`
/// - `"Invalid token"` for any other verification failure, including a refresh
///   token presented in place of an access token or one whose user has been
///   deleted
///
/// # Example
///
/// ```rust,ignore
/// let protected = Router::new()
///     .route("/bookmarks", get(list_bookmarks_handler))
///     .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer));
/// ```
pub async fn layer(
    State(st): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    let token = bearer_token(&mut parts).await.inspect_err(|_| {
        tracing::warn!(path = %parts.uri.path(), "Request without bearer token");
    })?;

    let claims = st
        .token_service
        .verify(&token, TokenKind::Access)
        .inspect_err(|e| tracing::warn!(reason = %e, "Access token rejected"))?;

    st.auth_service
        .ensure_active(claims.sub)
        .await
        .inspect_err(|e| tracing::warn!(user_id = claims.sub, reason = %e, "Access token rejected"))?;

    let mut req = Request::from_parts(parts, body);
    req.extensions_mut().insert(AuthUser { id: claims.sub });

    Ok(next.run(req).await)
}
