//! Session resolution for server-rendered pages and API extractors.
//!
//! Handlers never read tokens directly; they ask the [`SessionProvider`] held
//! in `AppState`. Production uses [`JwtSessionProvider`]; tests substitute a
//! fake.

use async_trait::async_trait;
use axum::http::header::{AUTHORIZATION, COOKIE};
use axum::http::HeaderMap;
use cookie::{Cookie, SameSite};
use luminar_core::types::DbId;

use crate::auth::jwt::{validate_token, JwtConfig};

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE: &str = "luminar_session";

/// The authenticated caller behind a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionUser {
    pub user_id: DbId,
    pub email: String,
}

/// Decides whether a request carries a valid session.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// `None` when the request is anonymous or its token is invalid.
    async fn current_user(&self, headers: &HeaderMap) -> Option<SessionUser>;
}

/// Validates HS256 session tokens from a Bearer header or the session cookie.
#[derive(Debug, Clone)]
pub struct JwtSessionProvider {
    config: JwtConfig,
}

impl JwtSessionProvider {
    pub fn new(config: JwtConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl SessionProvider for JwtSessionProvider {
    async fn current_user(&self, headers: &HeaderMap) -> Option<SessionUser> {
        let token = session_token(headers)?;
        match validate_token(&token, &self.config) {
            Ok(claims) => Some(SessionUser {
                user_id: claims.sub,
                email: claims.email,
            }),
            Err(e) => {
                tracing::debug!(error = %e, "Rejected session token");
                None
            }
        }
    }
}

/// Extract the raw session token. A Bearer header wins over the cookie.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    if let Some(bearer) = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
    {
        return Some(bearer.trim().to_string());
    }

    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(Cookie::split_parse)
        .filter_map(Result::ok)
        .find(|c| c.name() == SESSION_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
}

/// `Set-Cookie` value that stores a freshly issued session token.
pub fn session_cookie(token: String, max_age_secs: i64, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(cookie::time::Duration::seconds(max_age_secs))
        .build()
}

/// `Set-Cookie` value that removes the session cookie.
pub fn clear_session_cookie(secure: bool) -> Cookie<'static> {
    let mut cookie = Cookie::build((SESSION_COOKIE, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .build();
    cookie.make_removal();
    cookie
}
