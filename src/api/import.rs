use axum::{Json, body::Bytes, extract::State};
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use super::{ApiError, ApiResponse, AppState};
use crate::services::{ImportError, ImportSummary};

impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        match err {
            ImportError::Io(e) => Self::validation(format!("Cannot read dataset: {e}")),
            ImportError::Csv(e) => Self::validation(format!("Malformed CSV: {e}")),
            ImportError::EmptyDataset => Self::validation("Dataset contains no movies"),
            ImportError::Database(msg) => Self::DatabaseError(msg),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ImportCsvRequest {
    /// Overrides `import.data_path`.
    pub path: Option<String>,
}

/// `POST /api/import/csv`
///
/// Replaces the catalog with the configured CSV file, or with the file
/// named in the body.
pub async fn import_csv(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<ApiResponse<ImportSummary>>, ApiError> {
    let request: ImportCsvRequest = if body.iter().all(u8::is_ascii_whitespace) {
        ImportCsvRequest::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| ApiError::validation(format!("Invalid import request: {e}")))?
    };
    let path = match request.path {
        Some(path) if !path.trim().is_empty() => PathBuf::from(path),
        _ => PathBuf::from(&state.config().read().await.import.data_path),
    };

    info!(path = %path.display(), "Import requested");
    let summary = state.shared.import_service.import_file(&path).await?;
    Ok(Json(ApiResponse::success(summary)))
}
