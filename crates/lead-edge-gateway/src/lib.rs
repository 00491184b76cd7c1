//! Lead Edge Gateway
//!
//! An edge handler in front of a SQL database:
//! - `GET /health` liveness probe
//! - `POST /api/lead` lead capture
//! - `GET /api/admin/stats` and `GET /api/admin/suppliers` behind a bearer token
//! - `GET /api/beverages` legacy demo query
//!
//! Every response carries the configured CORS headers.

pub mod admin_auth;
pub mod config;
pub mod context;
pub mod directory;
pub mod handlers;
pub mod pipeline;
pub mod router;
pub mod services;

use axum::Router;
use std::sync::Arc;

pub use config::AppConfig;
pub use context::Context;

/// Shared application state
pub struct AppState {
    pub config: AppConfig,
    pub ctx: Context,
}

impl AppState {
    pub fn new(config: AppConfig, db: services::Database) -> Self {
        let ctx = Context::new(&config, db);
        Self { config, ctx }
    }
}

/// The gateway router with its state attached, ready to serve.
pub fn app(state: Arc<AppState>) -> Router {
    router::create_gateway_router()
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state)
}
