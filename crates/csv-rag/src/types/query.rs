//! Query request types

use serde::{Deserialize, Serialize};

/// Natural-language question about a stored file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryRequest {
    /// File to ask about
    pub file_id: String,
    /// The question
    pub query: String,
}
