use chrono::{Duration, Utc};
use sqlx::{SqliteConnection, SqlitePool};

use crate::constants::{DEFAULT_REST_TIME_SECS, DEFAULT_THEME, DEFAULT_UNITS, ERR_EMAIL_EXISTS};
use crate::db::begin_write;
use crate::error::{AppError, Result};
use crate::models::User;
use crate::security::{
    generate_session_token, hash_password_blocking, hash_session_token, verify_password_blocking,
};

/// Registration input, already validated by the route layer
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

/// Registration, login and session lookup
pub struct AuthService<'a> {
    pool: &'a SqlitePool,
    session_ttl: Duration,
}

impl<'a> AuthService<'a> {
    pub fn new(pool: &'a SqlitePool, session_ttl_days: i64) -> Self {
        Self {
            pool,
            session_ttl: Duration::try_days(session_ttl_days).unwrap_or(Duration::MAX),
        }
    }

    /// Create a user with default preferences and open a session for them
    ///
    /// Returns the new user and the raw session token for the cookie.
    pub async fn register(&self, new_user: NewUser) -> Result<(User, String)> {
        let email = User::normalize_email(&new_user.email);
        let password_hash = hash_password_blocking(new_user.password).await?;
        let now = Utc::now();

        let mut tx = begin_write(self.pool).await?;

        let existing: Option<i64> = sqlx::query_scalar("SELECT id FROM users WHERE email = ?")
            .bind(&email)
            .fetch_optional(&mut *tx)
            .await?;
        if existing.is_some() {
            tracing::info!("Registration rejected: email already exists");
            return Err(AppError::Conflict(ERR_EMAIL_EXISTS.to_string()));
        }

        let user: User = sqlx::query_as(
            r#"
            INSERT INTO users (email, password_hash, first_name, last_name, is_admin, created_at)
            VALUES (?, ?, ?, ?, 0, ?)
            RETURNING id, email, password_hash, first_name, last_name, is_admin, created_at
            "#,
        )
        .bind(&email)
        .bind(&password_hash)
        .bind(new_user.first_name.trim())
        .bind(new_user.last_name.trim())
        .bind(now)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            let err = AppError::from(e);
            if err.is_unique_violation() {
                AppError::Conflict(ERR_EMAIL_EXISTS.to_string())
            } else {
                err
            }
        })?;

        sqlx::query(
            r#"
            INSERT INTO user_preferences (user_id, units, default_rest_time, theme, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(user.id)
        .bind(DEFAULT_UNITS)
        .bind(DEFAULT_REST_TIME_SECS)
        .bind(DEFAULT_THEME)
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        let token = self.insert_session(&mut *tx, user.id).await?;

        tx.commit().await?;

        tracing::info!("New user registered: id={}", user.id);

        Ok((user, token))
    }

    /// Check credentials and open a long-lived session
    pub async fn login(&self, email: &str, password: &str) -> Result<(User, String)> {
        let email = User::normalize_email(email);

        let user: Option<User> = sqlx::query_as(
            r#"
            SELECT id, email, password_hash, first_name, last_name, is_admin, created_at
            FROM users
            WHERE email = ?
            "#,
        )
        .bind(&email)
        .fetch_optional(self.pool)
        .await?;

        let Some(user) = user else {
            tracing::warn!("Login attempt for unknown email");
            return Err(AppError::InvalidCredentials);
        };

        if !verify_password_blocking(password.to_string(), user.password_hash.clone()).await? {
            tracing::warn!("Failed login for user {}", user.id);
            return Err(AppError::InvalidCredentials);
        }

        let mut conn = self.pool.acquire().await?;
        let token = self.insert_session(&mut *conn, user.id).await?;

        tracing::info!("User {} logged in", user.id);

        Ok((user, token))
    }

    /// End the session identified by `token`; unknown tokens are ignored
    pub async fn logout(&self, token: &str) -> Result<()> {
        let result = sqlx::query("DELETE FROM sessions WHERE token_hash = ?")
            .bind(hash_session_token(token))
            .execute(self.pool)
            .await?;

        if result.rows_affected() > 0 {
            tracing::info!("Session ended");
        }

        Ok(())
    }

    /// Resolve a session token to its user
    ///
    /// Expired sessions are deleted and reported as `Unauthenticated`.
    pub async fn authenticate(&self, token: &str) -> Result<User> {
        let token_hash = hash_session_token(token);

        let row: Option<(i64, chrono::DateTime<Utc>)> =
            sqlx::query_as("SELECT user_id, expires_at FROM sessions WHERE token_hash = ?")
                .bind(&token_hash)
                .fetch_optional(self.pool)
                .await?;

        let (user_id, expires_at) = row.ok_or(AppError::Unauthenticated)?;

        if expires_at <= Utc::now() {
            sqlx::query("DELETE FROM sessions WHERE token_hash = ?")
                .bind(&token_hash)
                .execute(self.pool)
                .await?;
            tracing::debug!("Expired session purged for user {}", user_id);
            return Err(AppError::Unauthenticated);
        }

        sqlx::query_as(
            r#"
            SELECT id, email, password_hash, first_name, last_name, is_admin, created_at
            FROM users
            WHERE id = ?
            "#,
        )
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(AppError::Unauthenticated)
    }

    async fn insert_session(&self, conn: &mut SqliteConnection, user_id: i64) -> Result<String> {
        let token = generate_session_token();
        let now = Utc::now();
        let expires_at = now.checked_add_signed(self.session_ttl).ok_or_else(|| {
            AppError::Internal(format!(
                "session lifetime of {} overflows the timestamp range",
                self.session_ttl
            ))
        })?;

        sqlx::query(
            "INSERT INTO sessions (token_hash, user_id, created_at, expires_at) VALUES (?, ?, ?, ?)",
        )
        .bind(hash_session_token(&token))
        .bind(user_id)
        .bind(now)
        .bind(expires_at)
        .execute(conn)
        .await?;

        Ok(token)
    }
}
