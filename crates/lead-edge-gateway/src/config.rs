//! Application configuration

use std::env;
use std::fmt;
use std::path::PathBuf;

use axum::http::HeaderValue;

use crate::directory::SupplierSchema;

/// Application configuration loaded from environment variables.
///
/// Loaded once at startup and immutable afterwards; handlers see it only
/// through the [`Context`](crate::Context) built from it.
#[derive(Clone)]
pub struct AppConfig {
    /// Port the gateway listens on
    pub port: u16,

    /// Path to the SQLite database file (or `:memory:`)
    pub database_path: PathBuf,

    /// Bearer token for `/api/admin`. `None` rejects every admin request.
    pub admin_token: Option<String>,

    /// Value of `Access-Control-Allow-Origin`
    pub allowed_origin: String,

    /// Which supplier table layout this deployment reads
    pub supplier_schema: SupplierSchema,

    /// Maximum accepted request body size in bytes
    pub max_body_bytes: usize,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            port: env::var("LEAD_EDGE_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(8080),

            database_path: env::var("LEAD_EDGE_DATABASE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./data/leads.db")),

            admin_token: env::var("LEAD_EDGE_ADMIN_TOKEN")
                .ok()
                .filter(|token| !token.is_empty()),

            allowed_origin: parse_allowed_origin(env::var("LEAD_EDGE_ALLOWED_ORIGIN").ok()),

            supplier_schema: match env::var("LEAD_EDGE_SUPPLIER_SCHEMA") {
                Ok(value) => value.parse().unwrap_or_else(|e| {
                    tracing::warn!("{}, falling back to flat schema", e);
                    SupplierSchema::Flat
                }),
                Err(_) => SupplierSchema::Flat,
            },

            max_body_bytes: env::var("LEAD_EDGE_MAX_BODY_BYTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(1024 * 1024),
        }
    }
}

/// The origin must be usable as a header value; anything else falls back to `*`.
fn parse_allowed_origin(value: Option<String>) -> String {
    match value.filter(|origin| !origin.is_empty()) {
        Some(origin) if HeaderValue::from_str(&origin).is_ok() => origin,
        Some(origin) => {
            tracing::warn!("LEAD_EDGE_ALLOWED_ORIGIN {:?} is not a valid header value, falling back to *", origin);
            "*".to_string()
        }
        None => "*".to_string(),
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            database_path: PathBuf::from("./data/leads.db"),
            admin_token: None,
            allowed_origin: "*".to_string(),
            supplier_schema: SupplierSchema::Flat,
            max_body_bytes: 1024 * 1024,
        }
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("port", &self.port)
            .field("database_path", &self.database_path)
            .field("admin_token", &self.admin_token.as_ref().map(|_| "<redacted>"))
            .field("allowed_origin", &self.allowed_origin)
            .field("supplier_schema", &self.supplier_schema)
            .field("max_body_bytes", &self.max_body_bytes)
            .finish()
    }
}
