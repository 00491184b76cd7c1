//! Admin read API: aggregate counts and the supplier listing
//!
//! Both handlers run behind the admin guard; they never check auth themselves.

use lead_edge_sdk::{HandlerError, Request, Response};
use serde::Serialize;
use serde_json::json;

use crate::directory::count;
use crate::services::ServiceError;
use crate::Context;

/// Upper bound on rows returned by the supplier listing.
pub const SUPPLIER_LIST_LIMIT: u32 = 200;

/// Counts shown on the admin dashboard.
///
/// Each count is a separate query; they are not a consistent snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AdminStats {
    pub suppliers_total: i64,
    pub suppliers_pending: i64,
    pub suppliers_active: i64,
    pub jobs_total: i64,
    pub buyers_total: i64,
    pub early_access_total: i64,
}

/// `GET /api/admin/stats`
pub async fn admin_stats(ctx: &Context) -> Result<Response, HandlerError> {
    let db = &ctx.db;
    let suppliers = &ctx.suppliers;

    let stats = AdminStats {
        suppliers_total: suppliers.count_suppliers(db, None).await?,
        suppliers_pending: suppliers.count_suppliers(db, Some("pending")).await?,
        suppliers_active: suppliers.count_suppliers(db, Some("active")).await?,
        jobs_total: count(db.prepare("SELECT COUNT(*) AS c FROM jobs")).await?,
        buyers_total: suppliers.count_buyers(db).await?,
        early_access_total: early_access_total(ctx).await?,
    };

    Ok(Response::ok(stats))
}

/// Not every deployment has signups; a missing table counts as zero.
async fn early_access_total(ctx: &Context) -> Result<i64, ServiceError> {
    match count(ctx.db.prepare("SELECT COUNT(*) AS c FROM early_access")).await {
        Err(ServiceError::NoSuchTable(_)) => Ok(0),
        other => other,
    }
}

/// `status` query value to filter on. `all`, empty or absent means no filter.
pub fn status_filter(req: &Request) -> Option<String> {
    req.query_param("status")
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty() && s != "all")
}

/// `GET /api/admin/suppliers?status=<s>`
pub async fn list_suppliers(ctx: &Context, req: &Request) -> Result<Response, HandlerError> {
    let status = status_filter(req);
    let results = ctx
        .suppliers
        .list_suppliers(&ctx.db, status.as_deref(), SUPPLIER_LIST_LIMIT)
        .await?;

    Ok(Response::ok(json!({ "results": results })))
}
