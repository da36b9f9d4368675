use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;
use validator::Validate;

use crate::error::Result;
use crate::models::UserProfile;
use crate::services::{AuthService, NewUser};
use crate::session::{clear_session_cookie, session_cookie, session_token};
use crate::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100))]
    pub last_name: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Register a new user
///
/// Creates the user and their default preferences, then starts a session.
/// Returns 400 if the email is already registered.
pub async fn register(
    State(state): State<AppState>,
    payload: std::result::Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let Json(mut payload) = payload?;
    payload.email = payload.email.trim().to_string();
    payload.validate()?;

    let (user, token) = AuthService::new(&state.db, state.config.session_ttl_days)
        .register(NewUser {
            email: payload.email,
            password: payload.password,
            first_name: payload.first_name,
            last_name: payload.last_name,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        [(header::SET_COOKIE, session_cookie(&token, &state.config))],
        Json(UserProfile::from(user)),
    ))
}

/// Log in with email and password
///
/// The session is long-lived ("remember me").
pub async fn login(
    State(state): State<AppState>,
    payload: std::result::Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let Json(payload) = payload?;

    let (user, token) = AuthService::new(&state.db, state.config.session_ttl_days)
        .login(&payload.email, &payload.password)
        .await?;

    Ok((
        [(header::SET_COOKIE, session_cookie(&token, &state.config))],
        Json(UserProfile::from(user)),
    ))
}

/// End the current session and clear the cookie
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Result<impl IntoResponse> {
    if let Some(token) = session_token(&headers) {
        AuthService::new(&state.db, state.config.session_ttl_days)
            .logout(&token)
            .await?;
    }

    Ok((
        [(header::SET_COOKIE, clear_session_cookie(&state.config))],
        Json(json!({ "message": "Logged out" })),
    ))
}
