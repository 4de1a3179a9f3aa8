// Public modules
pub mod chat;
pub mod client;
pub mod clock;
pub mod error;
pub mod observability;
pub mod types;
pub mod utils;

// Re-exports
pub use client::{Backend, ChatClient};
pub use clock::{Clock, SystemClock};
pub use error::{Error, Result};
pub use types::*;
