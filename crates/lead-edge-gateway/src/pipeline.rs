//! Request pipeline: preflight, route match, admin guard, handler, CORS
//!
//! This is the whole request-handling contract independent of the HTTP server.
//! [`handle`] never fails: every outcome is a [`Response`] carrying the CORS
//! headers of the context's policy.

use lead_edge_sdk::{HandlerError, Request, Response};

use crate::admin_auth;
use crate::handlers;
use crate::Context;

/// The fixed route table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Health,
    CreateLead,
    AdminStats,
    AdminSuppliers,
    Beverages,
}

impl Route {
    /// Match a method and a normalized path. Anything else is not found.
    pub fn resolve(method: &str, path: &str) -> Option<Self> {
        match (method.to_ascii_uppercase().as_str(), path) {
            ("GET", "/health") => Some(Route::Health),
            ("POST", "/api/lead") => Some(Route::CreateLead),
            ("GET", "/api/admin/stats") => Some(Route::AdminStats),
            ("GET", "/api/admin/suppliers") => Some(Route::AdminSuppliers),
            ("GET", "/api/beverages") => Some(Route::Beverages),
            _ => None,
        }
    }
}

/// Strip trailing slashes; the root path stays `/`.
pub fn normalize_path(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/"
    } else {
        trimmed
    }
}

/// Run one request through the pipeline.
pub async fn handle(ctx: &Context, req: Request) -> Response {
    if req.is_method("OPTIONS") {
        return ctx.cors.preflight();
    }

    let response = match dispatch(ctx, &req).await {
        Ok(response) => response,
        Err(err) => {
            if err.is_internal() {
                tracing::error!(
                    request_id = %req.request_id,
                    method = %req.method,
                    path = %req.path,
                    "Handler error: {}",
                    err
                );
            }
            err.to_response()
        }
    };

    ctx.cors.apply(response)
}

async fn dispatch(ctx: &Context, req: &Request) -> Result<Response, HandlerError> {
    let path = normalize_path(&req.path);

    if admin_auth::is_admin_path(path) {
        admin_auth::authorize(req, ctx.admin_token.as_deref())?;
    }

    match Route::resolve(&req.method, path).ok_or(HandlerError::NotFound)? {
        Route::Health => handlers::health_check(ctx).await,
        Route::CreateLead => handlers::create_lead(ctx, req).await,
        Route::AdminStats => handlers::admin_stats(ctx).await,
        Route::AdminSuppliers => handlers::list_suppliers(ctx, req).await,
        Route::Beverages => handlers::list_beverages(ctx).await,
    }
}
