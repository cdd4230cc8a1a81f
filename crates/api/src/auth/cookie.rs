//! The HTTP-only `access_token` cookie used by the browser dashboard.

use axum::http::header::COOKIE;
use axum::http::HeaderMap;

/// Cookie carrying the access token.
pub const ACCESS_TOKEN_COOKIE: &str = "access_token";

/// Build the `Set-Cookie` value that stores `token` for `max_age_secs`.
///
/// Secure cookies use `SameSite=None` so a dashboard on another origin can
/// send them; plain-HTTP development falls back to `SameSite=Lax`.
pub fn session_cookie(token: &str, max_age_secs: i64, secure: bool) -> String {
    format!(
        "{ACCESS_TOKEN_COOKIE}={token}; Path=/; HttpOnly; Max-Age={max_age_secs}; {}",
        same_site(secure)
    )
}

/// Build the `Set-Cookie` value that removes the access token.
pub fn clear_cookie(secure: bool) -> String {
    format!(
        "{ACCESS_TOKEN_COOKIE}=; Path=/; HttpOnly; Max-Age=0; {}",
        same_site(secure)
    )
}

fn same_site(secure: bool) -> &'static str {
    if secure {
        "Secure; SameSite=None"
    } else {
        "SameSite=Lax"
    }
}

/// Read the access token from the request's `Cookie` headers, if present.
pub fn token_from_cookies(headers: &HeaderMap) -> Option<&str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == ACCESS_TOKEN_COOKIE && !value.is_empty())
        .map(|(_, value)| value)
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn session_cookie_attributes() {
        let plain = session_cookie("abc", 60, false);
        assert_eq!(plain, "access_token=abc; Path=/; HttpOnly; Max-Age=60; SameSite=Lax");

        let secure = session_cookie("abc", 60, true);
        assert!(secure.ends_with("Secure; SameSite=None"));
    }

    #[test]
    fn clear_cookie_expires_immediately() {
        assert!(clear_cookie(false).starts_with("access_token=; "));
        assert!(clear_cookie(false).contains("Max-Age=0"));
    }

    #[test]
    fn token_is_found_among_other_cookies() {
        let mut headers = HeaderMap::new();
        headers.append(COOKIE, HeaderValue::from_static("theme=dark"));
        headers.append(COOKIE, HeaderValue::from_static("lang=en; access_token=tok.en.value"));
        assert_eq!(token_from_cookies(&headers), Some("tok.en.value"));
    }

    #[test]
    fn empty_or_missing_cookie_yields_none() {
        let mut headers = HeaderMap::new();
        assert_eq!(token_from_cookies(&headers), None);

        headers.insert(COOKIE, HeaderValue::from_static("access_token="));
        assert_eq!(token_from_cookies(&headers), None);
    }
}
