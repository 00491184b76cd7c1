//! Bearer-token guard for the admin API

use lead_edge_sdk::{HandlerError, Request};

/// Every path at or below this prefix requires the admin token.
pub const ADMIN_PREFIX: &str = "/api/admin";

/// Whether `path` (already normalized) falls under [`ADMIN_PREFIX`].
pub fn is_admin_path(path: &str) -> bool {
    path == ADMIN_PREFIX
        || path
            .strip_prefix(ADMIN_PREFIX)
            .is_some_and(|rest| rest.starts_with('/'))
}

/// Token from `Authorization: Bearer <token>`; empty when the header or prefix is missing.
pub fn bearer_token(req: &Request) -> &str {
    req.header("Authorization")
        .and_then(|value| value.strip_prefix("Bearer "))
        .unwrap_or("")
}

/// Compare the request's bearer token with the configured secret.
///
/// Fails closed: no configured secret, an empty token, or any mismatch is
/// [`HandlerError::Unauthorized`].
pub fn authorize(req: &Request, expected: Option<&str>) -> Result<(), HandlerError> {
    let token = bearer_token(req);
    match expected {
        Some(secret) if !secret.is_empty() && !token.is_empty() && token == secret => Ok(()),
        _ => {
            tracing::info!(request_id = %req.request_id, path = %req.path, "Admin request rejected");
            Err(HandlerError::Unauthorized)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_auth(value: &str) -> Request {
        Request::new("GET", "/api/admin/stats").with_header("authorization", value)
    }

    #[test]
    fn test_admin_prefix_matching() {
        assert!(is_admin_path("/api/admin"));
        assert!(is_admin_path("/api/admin/stats"));
        assert!(is_admin_path("/api/admin/unknown/deeper"));
        assert!(!is_admin_path("/api/administrator"));
        assert!(!is_admin_path("/api/lead"));
    }

    #[test]
    fn test_bearer_token_extraction() {
        assert_eq!(bearer_token(&with_auth("Bearer abc123")), "abc123");
        assert_eq!(bearer_token(&with_auth("Basic abc123")), "");
        assert_eq!(bearer_token(&with_auth("bearer abc123")), "");
        assert_eq!(bearer_token(&Request::new("GET", "/")), "");
    }

    #[test]
    fn test_authorize_exact_match_only() {
        assert!(authorize(&with_auth("Bearer secret"), Some("secret")).is_ok());
        assert!(authorize(&with_auth("Bearer Secret"), Some("secret")).is_err());
        assert!(authorize(&with_auth("Bearer secret "), Some("secret")).is_err());
        assert!(authorize(&Request::new("GET", "/api/admin/stats"), Some("secret")).is_err());
    }

    #[test]
    fn test_authorize_fails_closed_without_secret() {
        assert!(authorize(&with_auth("Bearer anything"), None).is_err());
        assert!(authorize(&with_auth("Bearer "), Some("")).is_err());
        assert!(matches!(
            authorize(&with_auth("Basic x"), Some("secret")),
            Err(HandlerError::Unauthorized)
        ));
    }
}
