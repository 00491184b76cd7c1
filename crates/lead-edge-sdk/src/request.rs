//! HTTP Request representation for handlers

use crate::error::HandlerError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Represents an incoming HTTP request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Request {
    /// HTTP method (GET, POST, OPTIONS, etc.)
    pub method: String,

    /// Request path (e.g., "/api/lead")
    pub path: String,

    /// Query parameters
    #[serde(default)]
    pub query: HashMap<String, String>,

    /// HTTP headers
    #[serde(default)]
    pub headers: HashMap<String, String>,

    /// Request body
    #[serde(default)]
    pub body: Option<String>,

    /// Request ID for tracing
    #[serde(default)]
    pub request_id: String,
}

impl Request {
    /// Create a request with the given method and path.
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            ..Self::default()
        }
    }

    /// Add a header (builder pattern).
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Add a query parameter (builder pattern).
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    /// Set the body (builder pattern).
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Parse the body as JSON into a typed struct.
    ///
    /// A missing body is parsed as `null`, so structs fail and `Option`s succeed.
    ///
    /// # Example
    /// ```ignore
    /// #[derive(Deserialize)]
    /// struct Signup { email: String }
    ///
    /// let signup: Signup = req.json()?;
    /// ```
    pub fn json<T: for<'de> Deserialize<'de>>(&self) -> Result<T, HandlerError> {
        let body = self.body.as_deref().unwrap_or("null");
        Ok(serde_json::from_str(body)?)
    }

    /// Get a query parameter as a string reference.
    ///
    /// # Example
    /// ```ignore
    /// // URL: /api/admin/suppliers?status=pending
    /// let status = req.query_param("status"); // Some(&"pending".to_string())
    /// ```
    pub fn query_param(&self, key: &str) -> Option<&String> {
        self.query.get(key)
    }

    /// Get a header value (case-insensitive lookup).
    pub fn header(&self, key: &str) -> Option<&String> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v)
    }

    /// Check if request method matches (case-insensitive).
    pub fn is_method(&self, method: &str) -> bool {
        self.method.eq_ignore_ascii_case(method)
    }
}

impl Default for Request {
    fn default() -> Self {
        Self {
            method: "GET".to_string(),
            path: "/".to_string(),
            query: HashMap::new(),
            headers: HashMap::new(),
            body: None,
            request_id: String::new(),
        }
    }
}
