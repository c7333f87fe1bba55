//! File listing, preview and deletion endpoints

use axum::{
    extract::{Path, State},
    Json,
};

use crate::error::Result;
use crate::server::state::AppState;
use crate::types::{FileListResponse, MessageResponse, Row};

/// GET /files - List uploaded files
pub async fn list_files(State(state): State<AppState>) -> Result<Json<FileListResponse>> {
    let files = state.service().list_files()?;
    Ok(Json(FileListResponse { files }))
}

/// GET /preview/:file_id - First rows of a file
pub async fn preview_file(
    State(state): State<AppState>,
    Path(file_id): Path<String>,
) -> Result<Json<Vec<Row>>> {
    let rows = state.service().preview(&file_id)?;
    Ok(Json(rows))
}

/// DELETE /file/:file_id - Delete a file and its blob
pub async fn delete_file(
    State(state): State<AppState>,
    Path(file_id): Path<String>,
) -> Result<Json<MessageResponse>> {
    state.service().delete(&file_id).await?;
    Ok(Json(MessageResponse::new("File deleted successfully")))
}
