//! Slash command parsing for the chat REPL.
//!
//! This module handles parsing of special commands that start with `/`,
//! allowing users to control the conversation without sending messages
//! to the backend.

/// A parsed chat command.
///
/// These commands control the conversation and are not sent to the backend,
/// except for [`ChatCommand::Reset`] which calls the reset endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatCommand {
    /// Reset the conversation, locally and on the backend.
    Reset,

    /// Display conversation statistics.
    Stats,

    /// Show the current configuration.
    ShowConfig,

    /// Display help information.
    Help,

    /// Exit the chat application.
    Quit,

    /// Report a parsing error back to the caller.
    Invalid(String),
}

/// Parses user input for slash commands.
///
/// Returns `Some(ChatCommand)` if the input is a command,
/// or `None` if it should be treated as a regular message.
///
/// # Examples
///
/// ```
/// # use confab::chat::parse_command;
/// assert!(parse_command("/quit").is_some());
/// assert!(parse_command("/reset").is_some());
/// assert!(parse_command("Hello there!").is_none());
/// ```
pub fn parse_command(input: &str) -> Option<ChatCommand> {
    let input = input.trim();

    if !input.starts_with('/') {
        return None;
    }

    let mut parts = input[1..].splitn(2, ' ');
    let command = parts.next()?.to_lowercase();

    let result = match command.as_str() {
        "reset" => ChatCommand::Reset,
        "stats" | "status" => ChatCommand::Stats,
        "config" => ChatCommand::ShowConfig,
        "help" | "?" => ChatCommand::Help,
        "quit" | "exit" | "q" => ChatCommand::Quit,
        _ => ChatCommand::Invalid(format!(
            "Unknown command: /{command}. Type /help for commands."
        )),
    };

    Some(result)
}

/// Returns the help text listing available commands.
pub fn help_text() -> &'static str {
    "Available commands:\n\
     /reset          Reset the conversation (backend and local history)\n\
     /stats          Show conversation statistics\n\
     /config         Show the current configuration\n\
     /help           Show this help\n\
     /quit           Exit"
}
