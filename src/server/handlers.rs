//! Request handlers

use crate::error::AnalyzerError;
use crate::server::error::{bad_request, internal, AppError};
use crate::server::AppState;
use axum::{
    body::Bytes,
    extract::{
        multipart::{MultipartError, MultipartRejection},
        rejection::QueryRejection,
        Multipart, Query, State,
    },
    response::Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct AnalyzeQuery {
    /// Persist this upload; defaults to on when storage is enabled
    pub store: Option<bool>,
}

#[derive(Serialize)]
pub struct HealthResponse {
    status: String,
    version: String,
    uptime_secs: u64,
    storage_enabled: bool,
}

// GET /
pub async fn root_handler() -> Json<Value> {
    Json(json!({"status": "ok"}))
}

// GET /health
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        storage_enabled: state.storage.is_some(),
    })
}

// POST /analyze
pub async fn analyze_handler(
    State(state): State<AppState>,
    query: Result<Query<AnalyzeQuery>, QueryRejection>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Value>, AppError> {
    let Query(query) = query.map_err(|r| AppError(r.status(), r.body_text()))?;
    let mut multipart = multipart.map_err(|r| AppError(r.status(), r.body_text()))?;
    let (file_name, bytes) = read_upload(&mut multipart, state.max_upload_bytes).await?;

    let text = state
        .inputs
        .extract_uploaded_pdf(&file_name, bytes.to_vec())
        .await
        .map_err(|e| {
            if e.is_client_error() {
                log::info!("Rejected upload {}: {}", file_name, e);
            } else {
                log::warn!("Extraction failed for {}: {}", file_name, e);
            }
            AppError::from(e)
        })?;

    let engine = Arc::clone(&state.engine);
    let source_name = file_name.clone();
    let mut report = tokio::task::spawn_blocking(move || engine.analyze(&text, &source_name))
        .await
        .map_err(|e| internal(format!("Error processing file: {}", e)))??;

    if let Some(storage) = &state.storage {
        if query.store.unwrap_or(true) {
            storage.persist(Some(bytes.to_vec()), &mut report).await;
        }
    }

    Ok(Json(json!({"status": "success", "data": report})))
}

// GET /storage/stats
pub async fn storage_stats_handler(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    match &state.storage {
        Some(storage) => {
            let stats = storage.stats().await;
            let value = serde_json::to_value(stats).map_err(|e| internal(e.to_string()))?;
            Ok(Json(value))
        }
        None => Ok(Json(json!({"enabled": false}))),
    }
}

/// Pull the `file` field out of the form, checking its name before reading it
async fn read_upload(multipart: &mut Multipart, max_bytes: usize) -> Result<(String, Bytes), AppError> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        if !file_name.to_lowercase().ends_with(".pdf") {
            return Err(bad_request("Only PDF files are supported"));
        }

        let bytes = field.bytes().await.map_err(multipart_error)?;
        if bytes.len() > max_bytes {
            return Err(AnalyzerError::PayloadTooLarge {
                size: bytes.len(),
                limit: max_bytes,
            }
            .into());
        }

        return Ok((file_name, bytes));
    }

    Err(bad_request("No file uploaded: expected a multipart field named 'file'"))
}

fn multipart_error(err: MultipartError) -> AppError {
    AppError(err.status(), err.body_text())
}
