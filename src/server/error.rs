//! HTTP error responses

use crate::error::AnalyzerError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};

pub const NO_TEXT_MESSAGE: &str = "No text could be extracted from the PDF";

#[derive(Debug)]
pub struct AppError(pub StatusCode, pub String);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (
            self.0,
            Json(serde_json::json!({"status": "error", "error": self.1})),
        )
            .into_response()
    }
}

impl From<AnalyzerError> for AppError {
    fn from(err: AnalyzerError) -> Self {
        match err {
            AnalyzerError::EmptyText => bad_request(NO_TEXT_MESSAGE),
            AnalyzerError::UnsupportedFormat(msg) | AnalyzerError::InvalidInput(msg) => {
                bad_request(msg)
            }
            AnalyzerError::PayloadTooLarge { .. } => {
                AppError(StatusCode::PAYLOAD_TOO_LARGE, err.to_string())
            }
            other => internal(format!("Error processing file: {}", other)),
        }
    }
}

pub fn bad_request(msg: impl Into<String>) -> AppError {
    AppError(StatusCode::BAD_REQUEST, msg.into())
}

pub fn internal(msg: impl Into<String>) -> AppError {
    AppError(StatusCode::INTERNAL_SERVER_ERROR, msg.into())
}
