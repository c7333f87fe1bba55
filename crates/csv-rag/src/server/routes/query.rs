//! Query endpoint

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};

use crate::error::{Error, Result};
use crate::server::state::AppState;
use crate::types::{QueryRequest, QueryResponse};

/// POST /query - Ask a question about an uploaded file
pub async fn query_file(
    State(state): State<AppState>,
    payload: std::result::Result<Json<QueryRequest>, JsonRejection>,
) -> Result<Json<QueryResponse>> {
    let Json(request) = payload.map_err(|e| Error::InvalidRequest(e.body_text()))?;

    tracing::info!("Query on {}: {}", request.file_id, request.query);

    let response = state
        .service()
        .query(&request.file_id, &request.query)
        .await?;

    Ok(Json(QueryResponse { response }))
}
