use std::env;

use crate::constants::MAX_SESSION_TTL_DAYS;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub database_url: String,
    pub allowed_origins: Vec<String>,
    /// Lifetime of a login session ("remember me") in days
    pub session_ttl_days: i64,
    /// Whether the session cookie carries the `Secure` attribute
    pub cookie_secure: bool,
    /// Body limit applied to multipart equipment uploads
    pub max_upload_bytes: usize,
    pub environment: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if it exists (development)
        dotenvy::dotenv().ok();

        let server_host = env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let server_port = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .map_err(|_| "Invalid SERVER_PORT")?;

        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://./data/gym_tracker.db".to_string());

        let allowed_origins = parse_origins(
            &env::var("ALLOWED_ORIGINS").unwrap_or_else(|_| "http://localhost:5173".to_string()),
        );

        let session_ttl_days =
            parse_session_ttl(&env::var("SESSION_TTL_DAYS").unwrap_or_else(|_| "365".to_string()))?;

        let cookie_secure = parse_flag(&env::var("COOKIE_SECURE").unwrap_or_default())
            .ok_or("Invalid COOKIE_SECURE")?;

        let max_upload_bytes = env::var("MAX_UPLOAD_BYTES")
            .unwrap_or_else(|_| "5242880".to_string())
            .parse()
            .map_err(|_| "Invalid MAX_UPLOAD_BYTES")?;

        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

        Ok(Config {
            server_host,
            server_port,
            database_url,
            allowed_origins,
            session_ttl_days,
            cookie_secure,
            max_upload_bytes,
            environment,
        })
    }

    /// Get server address as string
    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

fn parse_session_ttl(raw: &str) -> Result<i64, String> {
    let days: i64 = raw
        .trim()
        .parse()
        .map_err(|_| "Invalid SESSION_TTL_DAYS".to_string())?;

    if !(1..=MAX_SESSION_TTL_DAYS).contains(&days) {
        return Err(format!(
            "SESSION_TTL_DAYS must be between 1 and {}",
            MAX_SESSION_TTL_DAYS
        ));
    }

    Ok(days)
}

/// Empty means unset, which is `false`
fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "" | "0" | "false" | "no" => Some(false),
        "1" | "true" | "yes" => Some(true),
        _ => None,
    }
}
