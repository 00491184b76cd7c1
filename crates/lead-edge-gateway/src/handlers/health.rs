//! Liveness probe

use lead_edge_sdk::{HandlerError, Response};
use serde_json::json;

use crate::services::Row;
use crate::Context;

const SENTINEL: i64 = 1;

/// `GET /health` - runs `SELECT 1 AS ok` and reports whether the sentinel came back.
///
/// A missing row or a failing probe reports `{"ok": false}` instead of an error.
pub async fn health_check(ctx: &Context) -> Result<Response, HandlerError> {
    let ok = match ctx.db.prepare("SELECT 1 AS ok").first().await {
        Ok(row) => sentinel_matches(row.as_ref()),
        Err(e) => {
            tracing::warn!("Health probe failed: {}", e);
            false
        }
    };

    Ok(Response::ok(json!({ "ok": ok })))
}

fn sentinel_matches(row: Option<&Row>) -> bool {
    row.and_then(|r| r.get_i64("ok")) == Some(SENTINEL)
}
