//! Configuration types for the chat client.
//!
//! This module provides CLI argument parsing via `arrrg` and configuration
//! structures for controlling the controller and its HTTP client.

use std::time::Duration;

use arrrg_derive::CommandLine;

use super::controller::DEFAULT_REPLY_DELAY;

/// Default backend base URL.
const DEFAULT_BASE_URL: &str = "http://localhost:8000/";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Command-line arguments for the confab-chat tool.
#[derive(CommandLine, Debug, Default, PartialEq, Eq)]
pub struct ChatArgs {
    /// Chat backend base URL.
    #[arrrg(optional, "Backend base URL (default: http://localhost:8000/)", "URL")]
    pub backend: Option<String>,

    /// Artificial delay before a reply becomes visible.
    #[arrrg(optional, "Reply delay in milliseconds (default: 500)", "MILLIS")]
    pub reply_delay_ms: Option<u64>,

    /// Per-request timeout.
    #[arrrg(optional, "Request timeout in seconds (default: 60)", "SECONDS")]
    pub timeout_secs: Option<u64>,

    /// Disable ANSI colors and styles.
    #[arrrg(flag, "Disable ANSI colors/styles")]
    pub no_color: bool,
}

/// Configuration for a conversation.
///
/// This struct holds the resolved configuration values after processing
/// command-line arguments with appropriate defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatConfig {
    /// Base URL of the chat backend.
    pub base_url: String,

    /// Artificial delay before a successful reply becomes visible.
    pub reply_delay: Duration,

    /// Per-request timeout for backend calls.
    pub request_timeout: Duration,

    /// Whether to use ANSI colors and styles in output.
    pub use_color: bool,
}

impl ChatConfig {
    /// Creates a new ChatConfig with default values.
    ///
    /// Defaults:
    /// - Base URL: `http://localhost:8000/`
    /// - Reply delay: 500 ms
    /// - Request timeout: 60 s
    /// - Color: enabled
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            reply_delay: DEFAULT_REPLY_DELAY,
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            use_color: true,
        }
    }

    /// Sets the backend base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Sets the reply delay.
    pub fn with_reply_delay(mut self, reply_delay: Duration) -> Self {
        self.reply_delay = reply_delay;
        self
    }

    /// Sets the request timeout.
    pub fn with_request_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }

    /// Disables ANSI color output.
    pub fn without_color(mut self) -> Self {
        self.use_color = false;
        self
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl From<ChatArgs> for ChatConfig {
    fn from(args: ChatArgs) -> Self {
        ChatConfig {
            base_url: args.backend.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            reply_delay: args
                .reply_delay_ms
                .map(Duration::from_millis)
                .unwrap_or(DEFAULT_REPLY_DELAY),
            request_timeout: Duration::from_secs(args.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)),
            use_color: !args.no_color,
        }
    }
}
