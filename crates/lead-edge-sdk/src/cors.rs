//! Cross-origin header policy applied to every outbound response

use crate::Response;

pub const ALLOW_ORIGIN: &str = "Access-Control-Allow-Origin";
pub const ALLOW_METHODS: &str = "Access-Control-Allow-Methods";
pub const ALLOW_HEADERS: &str = "Access-Control-Allow-Headers";

const ALLOWED_METHODS: &str = "GET,POST,OPTIONS";
const ALLOWED_HEADERS: &str = "Content-Type, Authorization";

/// CORS policy: a fixed set of headers with a configurable origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorsPolicy {
    allow_origin: String,
}

impl CorsPolicy {
    /// Policy allowing a single origin.
    pub fn new(allow_origin: impl Into<String>) -> Self {
        Self {
            allow_origin: allow_origin.into(),
        }
    }

    /// Policy allowing any origin (`*`).
    pub fn permissive() -> Self {
        Self::new("*")
    }

    pub fn allow_origin(&self) -> &str {
        &self.allow_origin
    }

    /// Header name/value pairs this policy adds.
    pub fn headers(&self) -> [(&'static str, &str); 3] {
        [
            (ALLOW_ORIGIN, self.allow_origin.as_str()),
            (ALLOW_METHODS, ALLOWED_METHODS),
            (ALLOW_HEADERS, ALLOWED_HEADERS),
        ]
    }

    /// Merge the policy headers onto `response`, overwriting same-named headers.
    pub fn apply(&self, response: Response) -> Response {
        self.headers()
            .into_iter()
            .fold(response, |response, (name, value)| response.with_header(name, value))
    }

    /// Response to an `OPTIONS` preflight: 204, no body, policy headers only.
    pub fn preflight(&self) -> Response {
        self.apply(Response::no_content())
    }
}

impl Default for CorsPolicy {
    fn default() -> Self {
        Self::permissive()
    }
}
