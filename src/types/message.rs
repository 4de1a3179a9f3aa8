use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Maximum number of characters a bot message may carry.
///
/// Replies longer than this are cut to the first `MAX_BOT_CONTENT_CHARS`
/// characters with [`TRUNCATION_MARKER`] appended.
pub const MAX_BOT_CONTENT_CHARS: usize = 300;

/// Marker appended to bot content that was truncated.
pub const TRUNCATION_MARKER: &str = "...";

/// Who produced a message.
#[derive(Debug, Copy, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageOrigin {
    /// The person typing into the widget.
    User,
    /// The chat backend (including templated error notices).
    Bot,
}

/// A single entry in the conversation.
///
/// Messages are immutable once created; the conversation only ever appends
/// them or clears the whole list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    /// Who produced the message.
    pub origin: MessageOrigin,

    /// The message text.
    pub content: String,

    /// When the message was appended to the conversation.
    #[serde(with = "crate::utils::time")]
    pub timestamp: OffsetDateTime,
}

impl Message {
    /// Create a user message.
    pub fn user(content: impl Into<String>, timestamp: OffsetDateTime) -> Self {
        Self {
            origin: MessageOrigin::User,
            content: content.into(),
            timestamp,
        }
    }

    /// Create a bot message verbatim.
    ///
    /// Used for error notices and other content already known to fit.
    pub fn bot(content: impl Into<String>, timestamp: OffsetDateTime) -> Self {
        Self {
            origin: MessageOrigin::Bot,
            content: content.into(),
            timestamp,
        }
    }

    /// Create a bot message from a backend reply, truncating long content.
    ///
    /// Content of at most [`MAX_BOT_CONTENT_CHARS`] characters is stored
    /// verbatim; longer content is cut to the first
    /// [`MAX_BOT_CONTENT_CHARS`] characters with [`TRUNCATION_MARKER`]
    /// appended. Counting is per character so multi-byte content is never
    /// split mid code point.
    pub fn bot_reply(content: &str, timestamp: OffsetDateTime) -> Self {
        Self::bot(truncate_reply(content), timestamp)
    }

    /// Returns true if this message came from the user.
    pub fn is_user(&self) -> bool {
        self.origin == MessageOrigin::User
    }

    /// Returns true if this message came from the bot.
    pub fn is_bot(&self) -> bool {
        self.origin == MessageOrigin::Bot
    }
}

fn truncate_reply(content: &str) -> String {
    match content.char_indices().nth(MAX_BOT_CONTENT_CHARS) {
        Some((idx, _)) => {
            let mut truncated = content[..idx].to_string();
            truncated.push_str(TRUNCATION_MARKER);
            truncated
        }
        None => content.to_string(),
    }
}
