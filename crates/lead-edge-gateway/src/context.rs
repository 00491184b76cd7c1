//! Context passed to every handler
//!
//! Built once at startup from [`AppConfig`] and shared by all requests. It is
//! read-only: handlers get the database binding, the supplier adapter, the
//! admin secret and the CORS policy from here and nowhere else.

use std::sync::Arc;

use lead_edge_sdk::CorsPolicy;

use crate::config::AppConfig;
use crate::directory::SupplierDirectory;
use crate::services::Database;

#[derive(Clone)]
pub struct Context {
    pub db: Database,
    pub suppliers: Arc<dyn SupplierDirectory>,
    pub admin_token: Option<String>,
    pub cors: CorsPolicy,
}

impl Context {
    pub fn new(config: &AppConfig, db: Database) -> Self {
        Self {
            db,
            suppliers: config.supplier_schema.directory(),
            admin_token: config.admin_token.clone().filter(|token| !token.is_empty()),
            cors: CorsPolicy::new(config.allowed_origin.clone()),
        }
    }
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("db", &self.db)
            .field("suppliers", &self.suppliers.schema())
            .field("admin_token", &self.admin_token.as_ref().map(|_| "<redacted>"))
            .field("allow_origin", &self.cors.allow_origin())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_debug_shows_origin_and_hides_token() {
        let config = AppConfig {
            admin_token: Some("s3cret-token".to_string()),
            allowed_origin: "https://app.example.com".to_string(),
            ..AppConfig::default()
        };
        let ctx = Context::new(&config, Database::open(":memory:").unwrap());

        let rendered = format!("{:?}", ctx);
        assert!(rendered.contains("https://app.example.com"));
        assert!(!rendered.contains("s3cret-token"));
    }
}
