//! Interactive chat client for a confab backend.
//!
//! This binary provides a REPL interface for chatting with the backend
//! behind `POST /chat` and `POST /chat/reset`.
//!
//! # Usage
//!
//! ```bash
//! # Basic usage with default settings
//! confab-chat
//!
//! # Point at a different backend
//! confab-chat --backend http://chat.example.com/
//!
//! # Skip the artificial reply delay
//! confab-chat --reply-delay-ms 0
//!
//! # Disable colors (useful for piping output)
//! confab-chat --no-color
//! ```
//!
//! # Commands
//!
//! While chatting, you can use slash commands:
//! - `/help` - Show available commands
//! - `/reset` - Reset the conversation
//! - `/stats` - Show conversation statistics
//! - `/config` - Show the current configuration
//! - `/quit` - Exit the application

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use arrrg::CommandLine;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing_subscriber::EnvFilter;

use confab::ChatClient;
use confab::chat::{
    ChatArgs, ChatCommand, ChatConfig, ConversationController, PlainTextRenderer, Renderer,
    help_text, parse_command,
};

/// Main entry point for the confab-chat application.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_target(false)
        .init();

    let (args, _) = ChatArgs::from_command_line_relaxed("confab-chat [OPTIONS]");
    let config = ChatConfig::from(args);
    let use_color = config.use_color;

    let client = ChatClient::with_options(
        Some(config.base_url.clone()),
        Some(config.request_timeout),
    )?;
    let controller = ConversationController::new(client, &config);
    let mut renderer = PlainTextRenderer::with_color(use_color);
    let mut rl = DefaultEditor::new()?;

    // Keep Ctrl+C from killing the process while a turn is in flight
    let interrupted = Arc::new(AtomicBool::new(false));
    let interrupted_clone = interrupted.clone();
    ctrlc::set_handler(move || {
        interrupted_clone.store(true, Ordering::Relaxed);
    })?;

    println!("Confab Chat (backend: {})", config.base_url);
    println!("Type /help for commands, /quit to exit\n");

    loop {
        // Reset interrupt flag before each input
        interrupted.store(false, Ordering::Relaxed);

        let readline = rl.readline("You: ");

        match readline {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(line);

                // Check for slash commands
                if let Some(cmd) = parse_command(line) {
                    match cmd {
                        ChatCommand::Quit => {
                            println!("Goodbye!");
                            break;
                        }
                        ChatCommand::Reset => {
                            controller.reset().await;
                            if controller.message_count() == 0 {
                                renderer.print_info("Conversation cleared.");
                            }
                        }
                        ChatCommand::Help => {
                            for line in help_text().lines() {
                                println!("    {}", line);
                            }
                        }
                        ChatCommand::Stats => {
                            print_stats(&controller);
                        }
                        ChatCommand::ShowConfig => {
                            print_config(&config);
                        }
                        ChatCommand::Invalid(message) => {
                            renderer.print_error(&message);
                        }
                    }
                    continue;
                }

                // Regular message - run one turn against the backend
                controller.set_pending_input(line);
                let before = controller.message_count();
                renderer.print_typing();
                controller.submit(line).await;

                let snapshot = controller.snapshot();
                for message in snapshot.messages.iter().skip(before) {
                    if message.is_bot() {
                        renderer.print_message(message);
                    }
                }

                if interrupted.load(Ordering::Relaxed) {
                    renderer.print_info("(interrupt ignored; the turn ran to completion)");
                }
            }
            Err(ReadlineError::Interrupted) => {
                // Ctrl+C at prompt - soft interrupt
                println!();
                continue;
            }
            Err(ReadlineError::Eof) => {
                // Ctrl+D - exit
                println!("\nGoodbye!");
                break;
            }
            Err(err) => {
                renderer.print_error(&format!("Input error: {}", err));
                break;
            }
        }
    }

    Ok(())
}

fn print_stats(controller: &ConversationController) {
    let stats = controller.stats();
    println!("    Conversation Statistics:");
    println!(
        "      Messages: {} ({} from you, {} from the bot)",
        stats.message_count, stats.user_messages, stats.bot_messages
    );
    println!(
        "      Turns: {} completed, {} failed",
        stats.turns_completed, stats.failed_turns
    );
    println!("      Reply delay: {} ms", stats.reply_delay.as_millis());
    println!(
        "      In flight: {}",
        if stats.awaiting_reply { "yes" } else { "no" }
    );
}

fn print_config(config: &ChatConfig) {
    println!("    Current Configuration:");
    println!("      Backend: {}", config.base_url);
    println!("      Reply delay: {} ms", config.reply_delay.as_millis());
    println!(
        "      Request timeout: {} s",
        config.request_timeout.as_secs()
    );
    println!(
        "      Color: {}",
        if config.use_color {
            "enabled"
        } else {
            "disabled"
        }
    );
}
