//! API request and response types.

use serde::{Deserialize, Serialize};

/// Question submitted from the page.
#[derive(Debug, Clone, Deserialize)]
pub struct AskRequest {
    /// Raw input text; blank input yields a warning
    #[serde(default)]
    pub question: String,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Service version
    pub version: String,

    /// Page the index was built from
    pub source: String,

    /// Number of indexed chunks
    pub chunks: usize,
}
