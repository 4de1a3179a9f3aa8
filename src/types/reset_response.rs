use serde::{Deserialize, Serialize};

/// Response body for a successful `POST /chat/reset`.
///
/// The controller treats any 2xx as success; the confirmation text is
/// accepted but ignored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResetResponse {
    /// Human-readable confirmation from the backend.
    pub message: String,
}
