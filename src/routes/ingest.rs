use axum::body::Bytes;
use axum::extract::State;
use axum::http::header::ACCESS_CONTROL_ALLOW_ORIGIN;
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::Instrument;
use uuid::Uuid;

use crate::error::AppError;
use crate::state::SharedState;
use crate::submission::{parser, Outcome};

/// Trigger entry point: one request is one form submission.
pub async fn ingest(
    State(state): State<SharedState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let mut response = match submit(&state, &headers, body).await {
        Ok(response) => response,
        Err(e) => e.into_response(),
    };

    // Browser forms posting cross-origin need this to read the result.
    if let Ok(origin) = HeaderValue::from_str(&state.config.cors_origins) {
        response
            .headers_mut()
            .insert(ACCESS_CONTROL_ALLOW_ORIGIN, origin);
    }

    response
}

async fn submit(
    state: &SharedState,
    headers: &HeaderMap,
    body: Bytes,
) -> Result<Response, AppError> {
    let content_type = headers
        .get("content-type")
        .and_then(|v| v.to_str().ok());

    let event = if content_type.is_some_and(|ct| ct.contains("multipart/form-data")) {
        parser::parse_multipart(headers, body)
            .await
            .map_err(AppError::BadRequest)?
    } else {
        parser::parse_body(content_type, &body).map_err(AppError::BadRequest)?
    };

    let span = tracing::info_span!(
        "submission",
        id = %Uuid::now_v7(),
        items = event.item_responses.len()
    );

    let outcome = state.notifier.handle(&event).instrument(span).await?;

    let body = match outcome {
        Outcome::Sent { .. } => json!({ "status": "sent" }),
        Outcome::MissingEmailAddress => json!({ "status": "skipped", "reason": "missing_email" }),
    };

    Ok((StatusCode::OK, Json(body)).into_response())
}

pub async fn ingest_options(State(state): State<SharedState>) -> Response {
    (
        [
            (
                "Access-Control-Allow-Origin",
                state.config.cors_origins.clone(),
            ),
            ("Access-Control-Allow-Methods", "POST, OPTIONS".to_string()),
            (
                "Access-Control-Allow-Headers",
                "Content-Type".to_string(),
            ),
            ("Access-Control-Max-Age", "86400".to_string()),
        ],
        StatusCode::NO_CONTENT,
    )
        .into_response()
}
