//! API routes for the CSV server

pub mod files;
pub mod query;
pub mod upload;

use axum::{
    extract::{DefaultBodyLimit, State},
    routing::{delete, get, post},
    Json, Router,
};

use crate::server::state::AppState;

/// Build all API routes
pub fn api_routes(max_upload_size: usize) -> Router<AppState> {
    Router::new()
        // Upload - with larger body limit for file uploads
        .route(
            "/upload",
            post(upload::upload_file).layer(DefaultBodyLimit::max(max_upload_size)),
        )
        // File management
        .route("/files", get(files::list_files))
        .route("/preview/:file_id", get(files::preview_file))
        .route("/file/:file_id", delete(files::delete_file))
        // Query
        .route("/query", post(query::query_file))
        // Info
        .route("/info", get(info))
}

/// API info endpoint
async fn info(State(state): State<AppState>) -> Json<serde_json::Value> {
    let service = state.service();
    Json(serde_json::json!({
        "name": "csv-rag",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "CSV upload, preview and natural-language queries",
        "endpoints": {
            "POST /upload": "Upload a CSV file (multipart field 'file')",
            "GET /files": "List uploaded files",
            "GET /preview/:file_id": "First 5 rows of a file",
            "POST /query": "Ask a question about a file",
            "DELETE /file/:file_id": "Delete a file"
        },
        "providers": {
            "blob_store": service.blobs().name(),
            "record_store": service.records().name(),
            "completion": service.completion().name(),
            "model": service.completion().model()
        }
    }))
}
