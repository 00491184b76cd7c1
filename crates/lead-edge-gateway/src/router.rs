//! Gateway router - adapts axum requests to the request pipeline
//!
//! Every request lands in a single fallback handler. It is converted to an SDK
//! [`Request`](lead_edge_sdk::Request), run through [`pipeline::handle`] and
//! converted back.

use axum::{
    body::Body,
    extract::State,
    http::{Method, Request, StatusCode},
    response::{IntoResponse, Response},
    Router,
};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::pipeline;
use crate::AppState;

/// Create the gateway router that handles all incoming requests
pub fn create_gateway_router() -> Router<Arc<AppState>> {
    Router::new().fallback(handle_gateway_request)
}

/// Handle an incoming gateway request
async fn handle_gateway_request(
    State(state): State<Arc<AppState>>,
    request: Request<Body>,
) -> Response {
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let request_id = Uuid::new_v4().to_string();

    tracing::debug!(
        request_id = %request_id,
        method = %method,
        path = %path,
        "Incoming request"
    );

    // Preflight never depends on the body, so answer before reading it.
    if request.method() == Method::OPTIONS {
        return into_http_response(state.ctx.cors.preflight());
    }

    let query: HashMap<String, String> = request
        .uri()
        .query()
        .map(|q| {
            url::form_urlencoded::parse(q.as_bytes())
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect()
        })
        .unwrap_or_default();

    let headers: HashMap<String, String> = request
        .headers()
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("").to_string()))
        .collect();

    let body_bytes = match axum::body::to_bytes(request.into_body(), state.config.max_body_bytes).await {
        Ok(b) => b,
        Err(e) => {
            tracing::warn!(request_id = %request_id, "Failed to read body: {}", e);
            let rejected = lead_edge_sdk::Response::bad_request("Failed to read body");
            return into_http_response(state.ctx.cors.apply(rejected));
        }
    };

    let body = if body_bytes.is_empty() {
        None
    } else {
        Some(String::from_utf8_lossy(&body_bytes).to_string())
    };

    let sdk_request = lead_edge_sdk::Request {
        method,
        path,
        query,
        headers,
        body,
        request_id,
    };

    into_http_response(pipeline::handle(&state.ctx, sdk_request).await)
}

fn into_http_response(sdk_response: lead_edge_sdk::Response) -> Response {
    let mut builder = Response::builder()
        .status(StatusCode::from_u16(sdk_response.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR));

    for (key, value) in &sdk_response.headers {
        builder = builder.header(key, value);
    }

    match builder.body(Body::from(sdk_response.body.unwrap_or_default())) {
        Ok(response) => response,
        Err(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Failed to build response").into_response(),
    }
}
