//! Token cookies.
//!
//! Both tokens travel in `HttpOnly; Secure` cookies so page scripts cannot
//! read them and browsers only send them over HTTPS. Handlers also accept the
//! tokens from the `Authorization` header or the request body.

use axum::http::{
    header::{AUTHORIZATION, COOKIE, SET_COOKIE},
    HeaderMap, HeaderValue,
};

use crate::backend::error::BackendError;

pub const ACCESS_TOKEN_COOKIE: &str = "accessToken";
pub const REFRESH_TOKEN_COOKIE: &str = "refreshToken";

/// Build a `Set-Cookie` value for a token.
pub fn token_cookie(name: &str, token: &str, max_age_secs: i64) -> Result<HeaderValue, BackendError> {
    HeaderValue::from_str(&format!(
        "{name}={token}; Path=/; HttpOnly; Secure; SameSite=Lax; Max-Age={max_age_secs}"
    ))
    .map_err(|e| {
        tracing::error!("Invalid cookie value for {}: {}", name, e);
        BackendError::internal("Failed to set cookie")
    })
}

/// Build a `Set-Cookie` value that removes the cookie.
pub fn clear_cookie(name: &str) -> HeaderValue {
    HeaderValue::from_str(&format!(
        "{name}=; Path=/; HttpOnly; Secure; SameSite=Lax; Max-Age=0"
    ))
    .unwrap_or_else(|_| HeaderValue::from_static("refreshToken=; Max-Age=0"))
}

/// Headers setting both token cookies.
pub fn set_token_cookies(
    access_token: &str,
    access_ttl_secs: i64,
    refresh_token: &str,
    refresh_ttl_secs: i64,
) -> Result<HeaderMap, BackendError> {
    let mut headers = HeaderMap::new();
    headers.append(
        SET_COOKIE,
        token_cookie(ACCESS_TOKEN_COOKIE, access_token, access_ttl_secs)?,
    );
    headers.append(
        SET_COOKIE,
        token_cookie(REFRESH_TOKEN_COOKIE, refresh_token, refresh_ttl_secs)?,
    );
    Ok(headers)
}

/// Headers clearing both token cookies.
pub fn clear_token_cookies() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.append(SET_COOKIE, clear_cookie(ACCESS_TOKEN_COOKIE));
    headers.append(SET_COOKIE, clear_cookie(REFRESH_TOKEN_COOKIE));
    headers
}

/// Read a cookie value from the request headers.
pub fn read_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| {
            let (key, val) = pair.trim().split_once('=')?;
            (key.trim() == name).then(|| val.trim().to_string())
        })
        .find(|val| !val.is_empty())
}

/// Read a `Bearer` token from the `Authorization` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let trimmed = value.trim();
    let token = trimmed
        .strip_prefix("Bearer ")
        .or_else(|| trimmed.strip_prefix("bearer "))?
        .trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}
