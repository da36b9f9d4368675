//! Session cookie handling and the authenticated-user extractor

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};

use crate::constants::SESSION_COOKIE_NAME;
use crate::error::AppError;
use crate::models::User;
use crate::services::AuthService;
use crate::{AppState, Config};

/// The user behind the current request's session
///
/// Rejects with `Unauthenticated` when no valid session is presented.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = session_token(&parts.headers).ok_or(AppError::Unauthenticated)?;

        let user = AuthService::new(&state.db, state.config.session_ttl_days)
            .authenticate(&token)
            .await?;

        Ok(CurrentUser(user))
    }
}

/// Extract the session token from the cookie, falling back to a bearer token
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    let from_cookie = headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find_map(|cookies| cookie_value(cookies, SESSION_COOKIE_NAME));

    from_cookie.or_else(|| {
        headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(String::from)
    })
}

/// Find `name` in a `Cookie` header value (`a=1; b=2`)
fn cookie_value(cookies: &str, name: &str) -> Option<String> {
    cookies
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, value)| *key == name && !value.is_empty())
        .map(|(_, value)| value.to_string())
}

/// `Set-Cookie` value establishing a session
pub fn session_cookie(token: &str, config: &Config) -> String {
    let max_age = config.session_ttl_days.saturating_mul(24 * 60 * 60);
    let mut cookie = format!(
        "{}={}; HttpOnly; SameSite=Lax; Path=/; Max-Age={}",
        SESSION_COOKIE_NAME, token, max_age
    );
    if config.cookie_secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// `Set-Cookie` value that removes the session cookie
pub fn clear_session_cookie(config: &Config) -> String {
    let mut cookie = format!(
        "{}=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0",
        SESSION_COOKIE_NAME
    );
    if config.cookie_secure {
        cookie.push_str("; Secure");
    }
    cookie
}
