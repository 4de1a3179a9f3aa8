//! Output rendering for the chat REPL.
//!
//! This module provides a trait-based rendering abstraction so the
//! controller's state can be displayed by different presentation layers.
//! The default implementation prints to stdout with optional ANSI styling.

use std::io::{self, Stdout, Write};

use time::macros::format_description;

use crate::types::{Message, MessageOrigin};

/// ANSI escape code for dim text (used for timestamps).
const ANSI_DIM: &str = "\x1b[2m";

/// ANSI escape code to reset all styling.
const ANSI_RESET: &str = "\x1b[0m";

/// ANSI escape code for cyan text (used for the bot label).
const ANSI_CYAN: &str = "\x1b[36m";

/// ANSI escape code for red text (used for errors).
const ANSI_RED: &str = "\x1b[31m";

/// Trait for rendering conversation output.
///
/// This abstraction allows for different rendering strategies:
/// - Plain text with ANSI styling
/// - Plain text without styling (for piping/redirecting)
/// - A richer TUI front end
pub trait Renderer: Send {
    /// Print one conversation message.
    fn print_message(&mut self, message: &Message);

    /// Print the typing indicator shown while a turn is in flight.
    fn print_typing(&mut self);

    /// Print an error message.
    fn print_error(&mut self, error: &str);

    /// Print an informational message.
    fn print_info(&mut self, info: &str);
}

/// Plain text renderer with optional ANSI styling.
pub struct PlainTextRenderer {
    stdout: Stdout,
    use_color: bool,
}

impl PlainTextRenderer {
    /// Creates a new PlainTextRenderer with ANSI colors enabled.
    pub fn new() -> Self {
        Self {
            stdout: io::stdout(),
            use_color: true,
        }
    }

    /// Creates a new PlainTextRenderer with specified color setting.
    pub fn with_color(use_color: bool) -> Self {
        Self {
            stdout: io::stdout(),
            use_color,
        }
    }

    /// Flushes stdout so partial lines appear immediately.
    fn flush(&mut self) {
        let _ = self.stdout.flush();
    }

    fn clock_time(message: &Message) -> String {
        let format = format_description!("[hour]:[minute]");
        message
            .timestamp
            .format(&format)
            .unwrap_or_else(|_| String::new())
    }
}

impl Default for PlainTextRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for PlainTextRenderer {
    fn print_message(&mut self, message: &Message) {
        let label = match message.origin {
            MessageOrigin::User => "You",
            MessageOrigin::Bot => "Bot",
        };
        let time = Self::clock_time(message);
        if self.use_color {
            let label_color = match message.origin {
                MessageOrigin::User => "",
                MessageOrigin::Bot => ANSI_CYAN,
            };
            println!(
                "{label_color}{label}{ANSI_RESET} {ANSI_DIM}[{time}]{ANSI_RESET} {}",
                message.content
            );
        } else {
            println!("{label} [{time}] {}", message.content);
        }
        self.flush();
    }

    fn print_typing(&mut self) {
        if self.use_color {
            println!("{ANSI_DIM}Bot is typing...{ANSI_RESET}");
        } else {
            println!("Bot is typing...");
        }
        self.flush();
    }

    fn print_error(&mut self, error: &str) {
        if self.use_color {
            eprintln!("{ANSI_RED}Error:{ANSI_RESET} {error}");
        } else {
            eprintln!("Error: {error}");
        }
    }

    fn print_info(&mut self, info: &str) {
        println!("{info}");
        self.flush();
    }
}
