//! Access checks for the pack size update endpoint.
//!
//! A request may change the pack sizes only if it comes from the configured
//! origin and carries `Authorization: Bearer <token>` with the configured
//! token. The origin is checked first, so a foreign page gets 403 without
//! learning anything about the token.

use axum::http::{HeaderMap, header};
use subtle::ConstantTimeEq;

use crate::config::SecurityConfig;
use crate::error::ApiError;

const BEARER_PREFIX: &str = "Bearer ";

/// Checks `Origin` and `Authorization` headers against `security`.
pub fn authorize_update(security: &SecurityConfig, headers: &HeaderMap) -> Result<(), ApiError> {
    let origin = header_str(headers, header::ORIGIN.as_str());
    if origin != Some(security.allowed_origin()) {
        tracing::warn!(origin = ?origin, "Pack size update from disallowed origin");
        return Err(ApiError::Forbidden);
    }

    let token = header_str(headers, header::AUTHORIZATION.as_str())
        .and_then(|value| value.strip_prefix(BEARER_PREFIX));
    match token {
        Some(token) if tokens_match(token, security.auth_token()) => Ok(()),
        _ => {
            tracing::warn!("Pack size update with invalid authorization token");
            Err(ApiError::Unauthorized)
        }
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

fn tokens_match(provided: &str, expected: &str) -> bool {
    provided.as_bytes().ct_eq(expected.as_bytes()).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn security() -> SecurityConfig {
        SecurityConfig::new("http://localhost:8080", "secret")
    }

    fn headers(origin: Option<&str>, authorization: Option<&str>) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Some(origin) = origin {
            headers.insert(header::ORIGIN, HeaderValue::from_str(origin).unwrap());
        }
        if let Some(authorization) = authorization {
            headers.insert(
                header::AUTHORIZATION,
                HeaderValue::from_str(authorization).unwrap(),
            );
        }
        headers
    }

    #[test]
    fn accepts_matching_origin_and_token() {
        let result = authorize_update(
            &security(),
            &headers(Some("http://localhost:8080"), Some("Bearer secret")),
        );
        assert!(result.is_ok());
    }

    #[test]
    fn rejects_foreign_or_missing_origin() {
        for origin in [Some("http://invalid-origin.com"), None] {
            let result = authorize_update(&security(), &headers(origin, Some("Bearer secret")));
            assert!(matches!(result, Err(ApiError::Forbidden)));
        }
    }

    #[test]
    fn rejects_bad_tokens() {
        for authorization in [
            Some("Bearer invalid_token"),
            Some("Bearer secre"),
            Some("Bearer secret2"),
            Some("secret"),
            Some("Basic secret"),
            None,
        ] {
            let result = authorize_update(
                &security(),
                &headers(Some("http://localhost:8080"), authorization),
            );
            assert!(
                matches!(result, Err(ApiError::Unauthorized)),
                "accepted {:?}",
                authorization
            );
        }
    }

    #[test]
    fn origin_is_checked_before_token() {
        let result = authorize_update(
            &security(),
            &headers(Some("http://invalid-origin.com"), Some("Bearer wrong")),
        );
        assert!(matches!(result, Err(ApiError::Forbidden)));
    }
}
