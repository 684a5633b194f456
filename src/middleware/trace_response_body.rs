use axum::{
    body::Body,
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use http_body_util::BodyExt;

use crate::{error::ApiError, server_error, state::ApiState};

/// Middlware to trace the response body.
///
/// Reads the entire response body into memory, so it only runs when `trace` is enabled.
pub async fn trace_response_body(
    State(state): State<ApiState>,
    req: Request,
    next: Next,
) -> Result<impl IntoResponse, ApiError> {
    let res = next.run(req).await;

    if !tracing::enabled!(tracing::Level::TRACE) {
        return Ok(res);
    }

    let (parts, body) = res.into_parts();
    let bytes = body.collect().await.map_err(server_error!(state))?.to_bytes();

    if let Ok(body) = std::str::from_utf8(&bytes) {
        tracing::trace!(status = %parts.status, %body, "Response body");
    }

    Ok(Response::from_parts(parts, Body::from(bytes)))
}
