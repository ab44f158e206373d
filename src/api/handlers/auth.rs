//! Handlers for registration, login, token refresh and the current user.

use axum::{
    Extension, Json,
    extract::{Request, State, rejection::JsonRejection},
    http::StatusCode,
};
use validator::Validate;

use crate::api::dto::auth::{
    LoginRequest, LoginResponse, RefreshResponse, RegisterRequest, UserEnvelope,
};
use crate::api::middleware::AuthUser;
use crate::api::middleware::auth::bearer_token;
use crate::error::AppError;
use crate::state::AppState;

/// Registers a new user.
///
/// # Endpoint
///
/// `POST /register`
///
/// # Request Body
///
/// ```json
/// { "email": "alice@example.com", "password": "secret123" }
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request if the email is malformed or already registered, or
/// the password is shorter than 6 characters.
pub async fn register_handler(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<UserEnvelope>), AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let user = state
        .auth_service
        .register(&payload.email, &payload.password)
        .await?;

    Ok((StatusCode::CREATED, Json(user.into())))
}

/// Exchanges credentials for an access/refresh token pair.
///
/// # Endpoint
///
/// `POST /login`
///
/// # Response
///
/// ```json
/// {
///   "user": { "id": 1, "email": "alice@example.com", ... },
///   "access_token": "eyJ...",
///   "refresh_token": "eyJ...",
///   "token_type": "Bearer"
/// }
/// ```
///
/// # Errors
///
/// Returns 401 Unauthorized with the same message for an unknown email and a
/// wrong password.
pub async fn login_handler(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let (user, tokens) = state
        .auth_service
        .login(&payload.email, &payload.password)
        .await?;

    Ok(Json(LoginResponse::new(user, tokens)))
}

/// Issues a new access token.
///
/// # Endpoint
///
/// `POST /token/refresh` with `Authorization: Bearer <refresh_token>`
///
/// # Errors
///
/// Returns 401 Unauthorized if the header is missing, the token is expired or
/// invalid, or an access token is presented instead of a refresh token.
pub async fn refresh_handler(
    State(state): State<AppState>,
    req: Request,
) -> Result<Json<RefreshResponse>, AppError> {
    let (mut parts, _) = req.into_parts();
    let token = bearer_token(&mut parts).await?;

    let access_token = state.auth_service.refresh(&token).await?;

    Ok(Json(RefreshResponse::new(access_token)))
}

/// Returns the authenticated user.
///
/// # Endpoint
///
/// `GET /me`
pub async fn me_handler(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<UserEnvelope>, AppError> {
    let user = state.auth_service.current_user(auth.id).await?;
    Ok(Json(user.into()))
}
