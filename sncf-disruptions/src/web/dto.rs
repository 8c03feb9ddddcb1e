//! Response bodies that are not sensor snapshots.

use serde::Serialize;

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}
