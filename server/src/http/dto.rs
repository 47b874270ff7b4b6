use serde::{Deserialize, Serialize};

/// Response for a delete request
#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteResponse {
    /// False when there was no object to delete
    pub deleted: bool,
}

/// Error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub details: Option<String>,
}
