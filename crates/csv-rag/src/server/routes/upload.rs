//! CSV upload endpoint

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};

use crate::error::{Error, Result};
use crate::server::state::AppState;
use crate::types::UploadResponse;

/// Multipart field carrying the upload
const FILE_FIELD: &str = "file";

/// POST /upload - Store and parse one CSV file
pub async fn upload_file(
    State(state): State<AppState>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>> {
    let mut multipart = multipart.map_err(|e| Error::InvalidRequest(e.body_text()))?;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        Error::InvalidRequest(format!("Failed to read multipart field: {}", e))
    })? {
        let name = field.name().unwrap_or("").to_string();
        if name != FILE_FIELD {
            tracing::debug!("Skipping multipart field '{}'", name);
            continue;
        }

        let filename = match field.file_name() {
            Some(f) if !f.is_empty() => f.to_string(),
            _ => {
                return Err(Error::InvalidRequest(
                    "Field 'file' has no filename".to_string(),
                ))
            }
        };

        let data = field.bytes().await.map_err(|e| {
            Error::InvalidRequest(format!("Failed to read '{}': {}", filename, e))
        })?;

        tracing::info!("Received upload '{}' ({} bytes)", filename, data.len());

        let record = state.service().upload(&filename, &data).await?;
        return Ok(Json(UploadResponse::from(&record)));
    }

    Err(Error::InvalidRequest("Missing multipart field 'file'".to_string()))
}
