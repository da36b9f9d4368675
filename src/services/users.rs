use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};

use crate::constants::{
    DEFAULT_REST_TIME_SECS, DEFAULT_THEME, DEFAULT_UNITS, ERR_CURRENT_PASSWORD, ERR_EMAIL_EXISTS,
};
use crate::db::begin_write;
use crate::error::{AppError, Result};
use crate::models::{Preferences, Theme, Units, User};
use crate::security::{hash_password_blocking, verify_password_blocking};

const USER_COLUMNS: &str =
    "id, email, password_hash, first_name, last_name, is_admin, created_at";
const PREFERENCE_COLUMNS: &str = "user_id, units, default_rest_time, theme, updated_at";

/// Partial profile update; `None` fields are left unchanged
#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    /// The password only changes when both of these are present
    pub current_password: Option<String>,
    pub new_password: Option<String>,
}

/// Partial preferences update; `None` fields are left unchanged
#[derive(Debug, Clone, Default)]
pub struct PreferenceChanges {
    pub units: Option<Units>,
    pub default_rest_time: Option<i64>,
    pub theme: Option<Theme>,
}

/// Profile and per-user settings
pub struct UserService<'a> {
    pool: &'a SqlitePool,
}

impl<'a> UserService<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Apply a partial profile update for `user`
    pub async fn update_profile(&self, user: &User, changes: ProfileChanges) -> Result<User> {
        // Password work happens before the transaction; Argon2 is slow
        let new_password_hash = match (changes.current_password, changes.new_password) {
            (Some(current), Some(new)) => {
                if !verify_password_blocking(current, user.password_hash.clone()).await? {
                    tracing::warn!("Password change for user {} rejected", user.id);
                    return Err(AppError::InvalidInput(ERR_CURRENT_PASSWORD.to_string()));
                }
                Some(hash_password_blocking(new).await?)
            }
            _ => None,
        };

        let email = changes.email.as_deref().map(User::normalize_email);

        let mut tx = begin_write(self.pool).await?;

        if let Some(ref email) = email {
            let taken: Option<i64> =
                sqlx::query_scalar("SELECT id FROM users WHERE email = ? AND id != ?")
                    .bind(email)
                    .bind(user.id)
                    .fetch_optional(&mut *tx)
                    .await?;
            if taken.is_some() {
                return Err(AppError::Conflict(ERR_EMAIL_EXISTS.to_string()));
            }
        }

        let updated: User = sqlx::query_as(&format!(
            r#"
            UPDATE users
            SET
                email = COALESCE(?, email),
                first_name = COALESCE(?, first_name),
                last_name = COALESCE(?, last_name),
                password_hash = COALESCE(?, password_hash)
            WHERE id = ?
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(&email)
        .bind(changes.first_name.as_deref().map(str::trim))
        .bind(changes.last_name.as_deref().map(str::trim))
        .bind(&new_password_hash)
        .bind(user.id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| {
            let err = AppError::from(e);
            if err.is_unique_violation() {
                AppError::Conflict(ERR_EMAIL_EXISTS.to_string())
            } else {
                err
            }
        })?
        .ok_or(AppError::NotFound("User"))?;

        tx.commit().await?;

        if new_password_hash.is_some() {
            tracing::info!("User {} changed their password", user.id);
        }
        tracing::info!("Profile updated for user {}", user.id);

        Ok(updated)
    }

    /// Preferences for `user_id`, creating the default row on first access
    pub async fn preferences(&self, user_id: i64) -> Result<Preferences> {
        let mut tx = begin_write(self.pool).await?;
        let preferences = ensure_preferences(&mut tx, user_id).await?;
        tx.commit().await?;

        Ok(preferences)
    }

    /// Apply a partial preferences update and stamp `updated_at`
    pub async fn update_preferences(
        &self,
        user_id: i64,
        changes: PreferenceChanges,
    ) -> Result<Preferences> {
        if let Some(rest) = changes.default_rest_time {
            if rest < 0 {
                return Err(AppError::InvalidInput(
                    "default_rest_time must not be negative".to_string(),
                ));
            }
        }

        let mut tx = begin_write(self.pool).await?;

        ensure_preferences(&mut tx, user_id).await?;

        let preferences: Preferences = sqlx::query_as(&format!(
            r#"
            UPDATE user_preferences
            SET
                units = COALESCE(?, units),
                default_rest_time = COALESCE(?, default_rest_time),
                theme = COALESCE(?, theme),
                updated_at = ?
            WHERE user_id = ?
            RETURNING {PREFERENCE_COLUMNS}
            "#
        ))
        .bind(changes.units.map(|u| u.as_str()))
        .bind(changes.default_rest_time)
        .bind(changes.theme.map(|t| t.as_str()))
        .bind(Utc::now())
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!("Preferences updated for user {}", user_id);

        Ok(preferences)
    }
}

/// Insert the default preferences row if missing, then return the current row
async fn ensure_preferences(conn: &mut SqliteConnection, user_id: i64) -> Result<Preferences> {
    let now = Utc::now();

    let inserted = sqlx::query(
        r#"
        INSERT INTO user_preferences (user_id, units, default_rest_time, theme, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?)
        ON CONFLICT (user_id) DO NOTHING
        "#,
    )
    .bind(user_id)
    .bind(DEFAULT_UNITS)
    .bind(DEFAULT_REST_TIME_SECS)
    .bind(DEFAULT_THEME)
    .bind(now)
    .bind(now)
    .execute(&mut *conn)
    .await?;

    if inserted.rows_affected() > 0 {
        tracing::info!("Created default preferences for user {}", user_id);
    }

    let preferences = sqlx::query_as(&format!(
        "SELECT {PREFERENCE_COLUMNS} FROM user_preferences WHERE user_id = ?"
    ))
    .bind(user_id)
    .fetch_one(&mut *conn)
    .await?;

    Ok(preferences)
}
