//! Vendor authentication extractor
//!
//! Resolves the calling vendor from a bearer token or the session cookie
//! through the identity-provider client. Handlers that take an
//! `AuthVendor` argument never run for an unauthenticated request.

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, StatusCode},
    Json,
};
use uuid::Uuid;

use crate::models::common::ErrorResponse;
use crate::AppState;

pub const SESSION_COOKIE: &str = "vendor_session";

#[derive(Debug, Clone, Copy)]
pub struct AuthVendor {
    pub vendor_id: Uuid,
}

/// Bearer header wins over the cookie when both are present
fn token_from_parts(parts: &Parts) -> Option<String> {
    if let Some(value) = parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
    {
        if let Some(token) = value.strip_prefix("Bearer ") {
            let token = token.trim();
            if !token.is_empty() {
                return Some(token.to_string());
            }
        }
    }

    let cookies = parts.headers.get(header::COOKIE)?.to_str().ok()?;
    cookies
        .split(';')
        .map(str::trim)
        .filter_map(|pair| pair.split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.to_string())
        .filter(|v| !v.is_empty())
}

fn unauthorized() -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::UNAUTHORIZED,
        Json(ErrorResponse {
            error: "Not authenticated".to_string(),
        }),
    )
}

impl FromRequestParts<AppState> for AuthVendor {
    type Rejection = (StatusCode, Json<ErrorResponse>);

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = token_from_parts(parts).ok_or_else(unauthorized)?;

        match state.identity.resolve(&token).await {
            Ok(Some(identity)) => Ok(AuthVendor {
                vendor_id: identity.vendor_id,
            }),
            Ok(None) => Err(unauthorized()),
            Err(e) => Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Identity resolution failed: {}", e),
                }),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with(name: header::HeaderName, value: &str) -> Parts {
        let (parts, _) = Request::builder()
            .header(name, value)
            .body(())
            .unwrap()
            .into_parts();
        parts
    }

    #[test]
    fn extracts_bearer_token() {
        let parts = parts_with(header::AUTHORIZATION, "Bearer tok-123");
        assert_eq!(token_from_parts(&parts), Some("tok-123".to_string()));
    }

    #[test]
    fn extracts_session_cookie() {
        let parts = parts_with(header::COOKIE, "theme=dark; vendor_session=tok-456");
        assert_eq!(token_from_parts(&parts), Some("tok-456".to_string()));
    }

    #[test]
    fn bearer_wins_over_cookie() {
        let (parts, _) = Request::builder()
            .header(header::AUTHORIZATION, "Bearer tok-a")
            .header(header::COOKIE, "vendor_session=tok-b")
            .body(())
            .unwrap()
            .into_parts();
        assert_eq!(token_from_parts(&parts), Some("tok-a".to_string()));
    }

    #[test]
    fn missing_credentials_yield_none() {
        let (parts, _) = Request::builder().body(()).unwrap().into_parts();
        assert_eq!(token_from_parts(&parts), None);

        let parts = parts_with(header::COOKIE, "theme=dark");
        assert_eq!(token_from_parts(&parts), None);

        let parts = parts_with(header::AUTHORIZATION, "Bearer ");
        assert_eq!(token_from_parts(&parts), None);
    }
}
