//! HTTP Response representation for handlers

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Represents an outgoing HTTP response.
///
/// # Quick Reference
///
/// | Method | Status | Use Case |
/// |--------|--------|----------|
/// | `ok(body)` | 200 | Successful JSON response |
/// | `no_content()` | 204 | Preflight |
/// | `bad_request(msg)` | 400 | Invalid input |
/// | `not_found()` | 404 | No matching route |
///
/// Error responses for handlers come from [`HandlerError::to_response`](crate::HandlerError::to_response).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    /// HTTP status code
    pub status: u16,

    /// Response headers
    #[serde(default)]
    pub headers: HashMap<String, String>,

    /// Response body
    #[serde(default)]
    pub body: Option<String>,
}

impl Response {
    /// Create a new response with the given status code (no body).
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: None,
        }
    }

    /// Create a 200 OK response with JSON body.
    ///
    /// # Example
    /// ```ignore
    /// Response::ok(json!({"ok": true}))
    /// ```
    pub fn ok<T: Serialize>(body: T) -> Self {
        Self::json(200, body)
    }

    /// Create a JSON response with a custom status code.
    pub fn json<T: Serialize>(status: u16, body: T) -> Self {
        let mut headers = HashMap::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());

        Self {
            status,
            headers,
            body: serde_json::to_string(&body).ok(),
        }
    }

    /// Create a 404 Not Found response.
    pub fn not_found() -> Self {
        Self::json(404, serde_json::json!({"error": "Not found"}))
    }

    /// Create a 400 Bad Request response.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::json(400, serde_json::json!({"error": message.into()}))
    }

    /// Create a 204 No Content response.
    pub fn no_content() -> Self {
        Self::new(204)
    }

    /// Set a header, replacing any existing header with the same name
    /// regardless of case (builder pattern).
    ///
    /// # Example
    /// ```ignore
    /// Response::ok(json!({"data": "value"}))
    ///     .with_header("Cache-Control", "no-store")
    /// ```
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        self.headers.retain(|existing, _| !existing.eq_ignore_ascii_case(&key));
        self.headers.insert(key, value.into());
        self
    }

    /// Get a header value (case-insensitive lookup).
    pub fn header(&self, key: &str) -> Option<&String> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v)
    }

    /// Merge the CORS headers of `policy` onto this response.
    pub fn with_cors(self, policy: &crate::CorsPolicy) -> Self {
        policy.apply(self)
    }

    /// Parse the body as JSON. An empty body parses as `null`.
    pub fn json_body(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::from_str(self.body.as_deref().unwrap_or("null"))
    }
}

impl Default for Response {
    fn default() -> Self {
        Self::new(200)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_response_sets_content_type() {
        let response = Response::ok(json!({"ok": true}));
        assert_eq!(response.status, 200);
        assert_eq!(response.header("content-type").map(String::as_str), Some("application/json"));
        assert_eq!(response.body.as_deref(), Some(r#"{"ok":true}"#));
    }

    #[test]
    fn test_with_header_replaces_case_insensitively() {
        let response = Response::new(200)
            .with_header("access-control-allow-origin", "https://old.example")
            .with_header("Access-Control-Allow-Origin", "*");

        assert_eq!(response.headers.len(), 1);
        assert_eq!(response.header("ACCESS-CONTROL-ALLOW-ORIGIN").map(String::as_str), Some("*"));
    }

    #[test]
    fn test_no_content_has_no_body() {
        let response = Response::no_content();
        assert_eq!(response.status, 204);
        assert!(response.body.is_none());
        assert!(response.headers.is_empty());
    }

    #[test]
    fn test_not_found_body() {
        let response = Response::not_found();
        assert_eq!(response.json_body().unwrap(), json!({"error": "Not found"}));
    }
}
