use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::email::MailError;

#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    Mail(MailError),
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::BadRequest(msg) => write!(f, "Bad Request: {msg}"),
            AppError::Mail(err) => write!(f, "Mail Error: {err}"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Mail(err) => {
                tracing::error!("Mail error: {err}");
                (
                    StatusCode::BAD_GATEWAY,
                    "Failed to send confirmation email".to_string(),
                )
            }
        };

        let body = json!({ "error": message });
        (status, axum::Json(body)).into_response()
    }
}

impl From<MailError> for AppError {
    fn from(err: MailError) -> Self {
        AppError::Mail(err)
    }
}
