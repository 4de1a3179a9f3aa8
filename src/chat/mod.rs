//! Chat application module for conversing with a chat backend.
//!
//! This module provides the conversation controller used by the confab-chat
//! REPL. It supports:
//!
//! - Single-flight message submission with a typing indicator
//! - Templated error notices in place of raw failures
//! - Conversation reset, guarded against in-flight turns
//! - Slash commands for session control
//!
//! # Architecture
//!
//! The module is organized into several components:
//!
//! - [`config`]: CLI argument parsing and configuration
//! - [`controller`]: Core conversation state and request lifecycle
//! - [`commands`]: Slash command parsing and handling
//! - [`render`]: Output rendering for the REPL

mod commands;
mod config;
mod controller;
mod render;

pub use commands::{ChatCommand, help_text, parse_command};
pub use config::{ChatArgs, ChatConfig};
pub use controller::{
    CONNECTION_ERROR_NOTICE, ConversationController, ConversationSnapshot, ConversationStats,
    DEFAULT_REPLY_DELAY, GENERIC_ERROR_NOTICE, SERVER_ERROR_NOTICE,
};
pub use render::{PlainTextRenderer, Renderer};
