use serde::{Deserialize, Serialize};

/// Response body for a successful `POST /chat`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatResponse {
    /// The bot's reply text, untruncated.
    pub response: String,
}

impl ChatResponse {
    /// Create a new `ChatResponse` with the given reply.
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
        }
    }
}
