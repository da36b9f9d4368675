use chrono::{DateTime, Utc};
use serde::Serialize;

/// User row as stored in the `users` table
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    /// Argon2 PHC string (algorithm, parameters and salt embedded)
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    /// Present in the data model but not enforced by any endpoint
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

/// User model for API responses (never carries the password hash)
#[derive(Debug, Clone, Serialize)]
pub struct UserProfile {
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            is_admin: user.is_admin,
            created_at: user.created_at,
        }
    }
}

impl User {
    /// Canonical form used for storage and lookup
    pub fn normalize_email(email: &str) -> String {
        email.trim().to_lowercase()
    }
}
