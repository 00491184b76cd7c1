//! Legacy demo route kept for existing dashboards

use lead_edge_sdk::{HandlerError, Response};

use crate::Context;

const SAMPLE_COMPANY: &str = "Bs Beverages";

/// `GET /api/beverages` - customers of the sample company, as a raw row array.
pub async fn list_beverages(ctx: &Context) -> Result<Response, HandlerError> {
    let rows = ctx
        .db
        .prepare("SELECT * FROM customers WHERE company_name = ?")
        .bind(SAMPLE_COMPANY)
        .all()
        .await?;

    Ok(Response::ok(rows))
}
