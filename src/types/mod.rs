// Public modules
pub mod chat_request;
pub mod chat_response;
pub mod message;
pub mod reset_response;

// Re-exports
pub use chat_request::ChatRequest;
pub use chat_response::ChatResponse;
pub use message::{MAX_BOT_CONTENT_CHARS, Message, MessageOrigin, TRUNCATION_MARKER};
pub use reset_response::ResetResponse;
