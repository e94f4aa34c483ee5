// ABOUTME: Credential extraction from inbound request headers
// ABOUTME: Pulls the bearer token callers present in multi-tenant deployments

use crate::error::{Result, SandboxError};
use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;

/// Extract the caller's API key from an `Authorization: Bearer <token>`
/// header. Fails closed: a missing, malformed, or empty header is
/// [`SandboxError::MissingCredential`], reported before any sandbox
/// operation is attempted.
pub fn bearer_token(headers: &HeaderMap) -> Result<String> {
    let value = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(SandboxError::MissingCredential)?;

    let token = value
        .strip_prefix("Bearer ")
        .or_else(|| value.strip_prefix("bearer "))
        .map(str::trim)
        .ok_or(SandboxError::MissingCredential)?;

    if token.is_empty() {
        return Err(SandboxError::MissingCredential);
    }

    Ok(token.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn extracts_bearer_token() {
        let token = bearer_token(&headers_with("Bearer sk-user-1")).unwrap();
        assert_eq!(token, "sk-user-1");
    }

    #[test]
    fn missing_header_fails_closed() {
        let err = bearer_token(&HeaderMap::new()).unwrap_err();
        assert!(matches!(err, SandboxError::MissingCredential));
    }

    #[test]
    fn non_bearer_scheme_is_rejected() {
        let err = bearer_token(&headers_with("Basic dXNlcjpwYXNz")).unwrap_err();
        assert!(matches!(err, SandboxError::MissingCredential));
    }

    #[test]
    fn empty_token_is_rejected() {
        let err = bearer_token(&headers_with("Bearer ")).unwrap_err();
        assert!(matches!(err, SandboxError::MissingCredential));
    }
}
