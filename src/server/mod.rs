// src/server/mod.rs
use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;

use crate::contract::models::ContractData;
use crate::extractors::ContractExtractor;
use crate::storage;
use crate::utils::config::ServerConfig;
use crate::utils::error::{AppError, ExtractError, StorageError};

/// Multipart field carrying the uploaded PDF.
pub const UPLOAD_FIELD: &str = "file";

/// Shown for every extraction failure; the specific cause is only logged.
pub const EXTRACTION_FAILED_MESSAGE: &str = "Could not process document";

/// Body of every extraction response. Extraction failures are reported here, never as HTTP errors.
#[derive(Debug, Serialize)]
pub struct ExtractResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<ContractData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<Result<ContractData, ExtractError>> for ExtractResponse {
    fn from(result: Result<ContractData, ExtractError>) -> Self {
        match result {
            Ok(data) => Self { success: true, data: Some(data), error: None },
            Err(_) => Self {
                success: false,
                data: None,
                error: Some(EXTRACTION_FAILED_MESSAGE.to_string()),
            },
        }
    }
}

// Shared application state
struct AppState {
    extractor: ContractExtractor,
    config: ServerConfig,
}

type HandlerError = (StatusCode, String);

async fn health() -> &'static str {
    "OK"
}

async fn extract_pdf(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<ExtractResponse>, HandlerError> {
    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?
    {
        if field.name() == Some(UPLOAD_FIELD) {
            let file_name = field.file_name().unwrap_or("<unnamed>").to_string();
            let bytes = field.bytes().await.map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;
            tracing::info!("Received upload {} ({} bytes)", file_name, bytes.len());
            upload = Some(bytes.to_vec());
            break;
        }
    }

    let bytes = upload.ok_or_else(|| {
        (StatusCode::BAD_REQUEST, format!("multipart field '{}' is required", UPLOAD_FIELD))
    })?;

    let result = state.extractor.extract_pdf(bytes).await;
    if let Err(e) = &result {
        tracing::warn!("Extraction failed: {}", e);
    }
    Ok(Json(ExtractResponse::from(result)))
}

/// The dataset shown before any upload.
async fn default_dataset(State(state): State<Arc<AppState>>) -> Result<Json<ContractData>, HandlerError> {
    let path = state
        .config
        .default_dataset
        .clone()
        .ok_or_else(|| (StatusCode::NOT_FOUND, "no default dataset configured".to_string()))?;

    let data = tokio::task::spawn_blocking(move || storage::load_dataset(path))
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?
        .map_err(|e| match e {
            StorageError::NotFound(_) => (StatusCode::NOT_FOUND, e.to_string()),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
        })?;

    Ok(Json(data))
}

pub fn router(config: ServerConfig) -> Router {
    let max_upload_bytes = config.max_upload_bytes;
    let state = Arc::new(AppState {
        extractor: ContractExtractor::new(config.extractor),
        config,
    });

    Router::new()
        .route("/health", get(health))
        .route("/api/pdf/extract", post(extract_pdf))
        .route("/data.json", get(default_dataset))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .with_state(state)
}

pub async fn serve(config: ServerConfig) -> Result<(), AppError> {
    let bind = config.bind;
    let app = router(config);

    let listener = tokio::net::TcpListener::bind(bind).await?;
    tracing::info!("Server running on http://{}", bind);
    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::Server(e.to_string()))
}
