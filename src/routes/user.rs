use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::models::{Preferences, Theme, Units, UserProfile};
use crate::services::{PreferenceChanges, ProfileChanges, UserService};
use crate::session::CurrentUser;
use crate::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub last_name: Option<String>,
    pub current_password: Option<String>,
    #[validate(length(min = 1, message = "New password must not be empty"))]
    pub new_password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePreferencesRequest {
    pub units: Option<String>,
    pub default_rest_time: Option<i64>,
    pub theme: Option<String>,
}

/// Current user's profile
pub async fn get_user(CurrentUser(user): CurrentUser) -> Json<UserProfile> {
    Json(UserProfile::from(user))
}

/// Update email, names and/or password
pub async fn update_user(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    payload: std::result::Result<Json<UpdateUserRequest>, JsonRejection>,
) -> Result<Json<UserProfile>> {
    let Json(mut payload) = payload?;
    payload.email = payload.email.map(|email| email.trim().to_string());
    payload.validate()?;

    let updated = UserService::new(&state.db)
        .update_profile(
            &user,
            ProfileChanges {
                email: payload.email,
                first_name: payload.first_name,
                last_name: payload.last_name,
                current_password: payload.current_password,
                new_password: payload.new_password,
            },
        )
        .await?;

    Ok(Json(UserProfile::from(updated)))
}

/// Current user's preferences, created with defaults on first access
pub async fn get_preferences(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Preferences>> {
    let preferences = UserService::new(&state.db).preferences(user.id).await?;
    Ok(Json(preferences))
}

/// Partially update preferences
pub async fn update_preferences(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    payload: std::result::Result<Json<UpdatePreferencesRequest>, JsonRejection>,
) -> Result<Json<Preferences>> {
    let Json(payload) = payload?;

    let changes = PreferenceChanges {
        units: payload
            .units
            .as_deref()
            .map(str::parse::<Units>)
            .transpose()
            .map_err(AppError::InvalidInput)?,
        default_rest_time: payload.default_rest_time,
        theme: payload
            .theme
            .as_deref()
            .map(str::parse::<Theme>)
            .transpose()
            .map_err(AppError::InvalidInput)?,
    };

    let preferences = UserService::new(&state.db)
        .update_preferences(user.id, changes)
        .await?;

    Ok(Json(preferences))
}
