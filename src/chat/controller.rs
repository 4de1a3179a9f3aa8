//! Core conversation state management.
//!
//! This module provides the `ConversationController` struct which owns the
//! visible conversation state and runs the request lifecycle for each turn:
//! user input becomes a pending request, the backend's reply (or failure)
//! becomes a bot message, and resets clear the whole conversation.

use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use crate::client::{Backend, ChatClient};
use crate::clock::{Clock, SystemClock};
use crate::error::Error;
use crate::observability;
use crate::types::Message;

use super::config::ChatConfig;

/// Artificial delay between a successful backend reply and the bot message
/// becoming visible.
pub const DEFAULT_REPLY_DELAY: Duration = Duration::from_millis(500);

/// Notice shown when no response was received from the backend.
pub const CONNECTION_ERROR_NOTICE: &str =
    "Connection error. Please check if the backend is running.";

/// Notice shown when the backend answered with a 500.
pub const SERVER_ERROR_NOTICE: &str = "Server error. Please try a different message.";

/// Notice shown for any other failure.
pub const GENERIC_ERROR_NOTICE: &str = "Sorry, I encountered an error. Please try again.";

/// Conversation state owned by the controller.
///
/// `generation` is bumped by every successful reset; a turn that started
/// under an older generation discards its resolution instead of mutating
/// state that has since been cleared.
#[derive(Debug, Default)]
struct ConversationState {
    messages: Vec<Message>,
    pending_input: String,
    awaiting_reply: bool,
    bot_typing: bool,
    generation: u64,
    turns_completed: u64,
    failed_turns: u64,
}

/// A point-in-time view of the conversation for the presentation layer.
#[derive(Debug, Clone)]
pub struct ConversationSnapshot {
    /// The messages in append order.
    pub messages: Vec<Message>,
    /// The text currently sitting in the input box.
    pub pending_input: String,
    /// Whether a turn is in flight (new submissions are rejected).
    pub awaiting_reply: bool,
    /// Whether the typing indicator should be shown.
    pub bot_typing: bool,
}

/// Aggregated stats for a conversation.
#[derive(Debug, Clone)]
pub struct ConversationStats {
    /// The number of messages in the conversation.
    pub message_count: usize,
    /// How many of those came from the user.
    pub user_messages: usize,
    /// How many of those came from the bot (replies and notices).
    pub bot_messages: usize,
    /// Turns that resolved with a backend reply.
    pub turns_completed: u64,
    /// Turns that resolved with an error notice.
    pub failed_turns: u64,
    /// Whether a turn is currently in flight.
    pub awaiting_reply: bool,
    /// Whether the typing indicator is active.
    pub bot_typing: bool,
    /// The configured artificial reply delay.
    pub reply_delay: Duration,
}

/// A conversation controller that mediates between raw user input and the
/// chat backend.
///
/// The controller enforces single-flight submission: while a turn is in
/// flight, further submissions are silently rejected. Each completed turn
/// appends exactly one user message and exactly one bot message.
pub struct ConversationController<B: Backend = ChatClient, C: Clock = SystemClock> {
    backend: B,
    clock: C,
    reply_delay: Duration,
    state: Mutex<ConversationState>,
}

impl ConversationController {
    /// Creates a new controller with the given client and configuration.
    pub fn new(client: ChatClient, config: &ChatConfig) -> Self {
        Self::with_parts(client, SystemClock, config)
    }
}

impl<B: Backend, C: Clock> ConversationController<B, C> {
    /// Creates a new controller from explicit collaborators.
    pub fn with_parts(backend: B, clock: C, config: &ChatConfig) -> Self {
        Self {
            backend,
            clock,
            reply_delay: config.reply_delay,
            state: Mutex::new(ConversationState::default()),
        }
    }

    /// Submits one user message and runs the turn to completion.
    ///
    /// The call is a no-op when `text` trims to empty or a turn is already
    /// in flight. Otherwise the user message is appended synchronously,
    /// before the first suspension point, and the method resolves once the
    /// corresponding bot message (reply or error notice) has been appended.
    ///
    /// A successful backend reply is held back by the configured reply
    /// delay before it becomes visible; failures append their notice
    /// immediately. Submit errors never propagate past this method: they
    /// are converted to a templated bot message and logged.
    pub async fn submit(&self, text: &str) {
        let generation;
        {
            let mut state = self.state();
            if text.trim().is_empty() || state.awaiting_reply {
                observability::CONTROLLER_SUBMITS_REJECTED.click();
                return;
            }
            state.messages.push(Message::user(text, self.clock.now()));
            state.pending_input.clear();
            state.awaiting_reply = true;
            state.bot_typing = true;
            generation = state.generation;
        }
        observability::CONTROLLER_SUBMITS.click();
        let started = std::time::Instant::now();

        match self.backend.send_message(text).await {
            Ok(reply) => {
                self.clock.sleep(self.reply_delay).await;
                let mut state = self.state();
                if state.generation != generation {
                    tracing::debug!("discarding reply for a conversation that was reset");
                    observability::CONTROLLER_STALE_REPLIES.click();
                    return;
                }
                state
                    .messages
                    .push(Message::bot_reply(&reply.response, self.clock.now()));
                state.bot_typing = false;
                state.awaiting_reply = false;
                state.turns_completed += 1;
            }
            Err(err) => {
                tracing::warn!(error = %err, "chat request failed");
                observability::CONTROLLER_TURN_ERRORS.click();
                let notice = error_notice(&err);
                let mut state = self.state();
                if state.generation != generation {
                    observability::CONTROLLER_STALE_REPLIES.click();
                    return;
                }
                state.messages.push(Message::bot(notice, self.clock.now()));
                state.bot_typing = false;
                state.awaiting_reply = false;
                state.failed_turns += 1;
            }
        }
        observability::CONTROLLER_TURN_DURATION.add(started.elapsed().as_secs_f64());
    }

    /// Resets the conversation.
    ///
    /// The backend reset endpoint is awaited first; only a successful call
    /// clears local state. On failure the conversation is left exactly as
    /// it was and the error is logged, never surfaced to the user.
    pub async fn reset(&self) {
        match self.backend.reset().await {
            Ok(()) => {
                observability::CONTROLLER_RESETS.click();
                let mut state = self.state();
                state.generation += 1;
                state.messages.clear();
                state.pending_input.clear();
                state.awaiting_reply = false;
                state.bot_typing = false;
            }
            Err(err) => {
                tracing::warn!(error = %err, "reset request failed; conversation left unchanged");
                observability::CONTROLLER_RESET_ERRORS.click();
            }
        }
    }

    /// Returns a snapshot of the conversation for rendering.
    pub fn snapshot(&self) -> ConversationSnapshot {
        let state = self.state();
        ConversationSnapshot {
            messages: state.messages.clone(),
            pending_input: state.pending_input.clone(),
            awaiting_reply: state.awaiting_reply,
            bot_typing: state.bot_typing,
        }
    }

    /// Returns the number of messages in the conversation.
    pub fn message_count(&self) -> usize {
        self.state().messages.len()
    }

    /// Returns true if a turn is currently in flight.
    pub fn is_awaiting_reply(&self) -> bool {
        self.state().awaiting_reply
    }

    /// Mirrors the input box into the conversation state.
    pub fn set_pending_input(&self, input: impl Into<String>) {
        self.state().pending_input = input.into();
    }

    /// Returns the text currently sitting in the input box.
    pub fn pending_input(&self) -> String {
        self.state().pending_input.clone()
    }

    /// Returns the current conversation statistics snapshot.
    pub fn stats(&self) -> ConversationStats {
        let state = self.state();
        ConversationStats {
            message_count: state.messages.len(),
            user_messages: state.messages.iter().filter(|m| m.is_user()).count(),
            bot_messages: state.messages.iter().filter(|m| m.is_bot()).count(),
            turns_completed: state.turns_completed,
            failed_turns: state.failed_turns,
            awaiting_reply: state.awaiting_reply,
            bot_typing: state.bot_typing,
            reply_delay: self.reply_delay,
        }
    }

    fn state(&self) -> MutexGuard<'_, ConversationState> {
        self.state.lock().expect("conversation state lock poisoned")
    }
}

/// Map a backend error to the notice shown in the conversation.
///
/// Classification depends only on whether a response was received and, if
/// so, whether its status was 500.
fn error_notice(err: &Error) -> &'static str {
    if err.is_no_response() {
        CONNECTION_ERROR_NOTICE
    } else if matches!(err, Error::InternalServer { .. }) {
        SERVER_ERROR_NOTICE
    } else {
        GENERIC_ERROR_NOTICE
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Arc;

    use crate::error::Result;
    use crate::types::{ChatResponse, MAX_BOT_CONTENT_CHARS, MessageOrigin, TRUNCATION_MARKER};

    use super::*;

    /// Backend that hands out queued responses, recording what was sent.
    #[derive(Default)]
    struct ScriptedBackend {
        replies: Mutex<VecDeque<Result<ChatResponse>>>,
        resets: Mutex<VecDeque<Result<()>>>,
        sent: Mutex<Vec<String>>,
    }

    impl ScriptedBackend {
        fn with_reply(reply: Result<ChatResponse>) -> Self {
            let backend = Self::default();
            backend.push_reply(reply);
            backend
        }

        fn push_reply(&self, reply: Result<ChatResponse>) {
            self.replies.lock().unwrap().push_back(reply);
        }

        fn push_reset(&self, outcome: Result<()>) {
            self.resets.lock().unwrap().push_back(outcome);
        }

        fn sent(&self) -> Vec<String> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait::async_trait]
    impl Backend for Arc<ScriptedBackend> {
        async fn send_message(&self, message: &str) -> Result<ChatResponse> {
            self.sent.lock().unwrap().push(message.to_string());
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(ChatResponse::new("ok")))
        }

        async fn reset(&self) -> Result<()> {
            self.resets.lock().unwrap().pop_front().unwrap_or(Ok(()))
        }
    }

    fn controller(
        backend: &Arc<ScriptedBackend>,
    ) -> ConversationController<Arc<ScriptedBackend>, SystemClock> {
        ConversationController::with_parts(
            Arc::clone(backend),
            SystemClock,
            &ChatConfig::default(),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn submit_appends_user_then_bot() {
        let backend = Arc::new(ScriptedBackend::with_reply(Ok(ChatResponse::new(
            "Hi there!",
        ))));
        let controller = controller(&backend);

        controller.submit("Hello").await;

        let snapshot = controller.snapshot();
        assert_eq!(snapshot.messages.len(), 2);
        assert_eq!(snapshot.messages[0].origin, MessageOrigin::User);
        assert_eq!(snapshot.messages[0].content, "Hello");
        assert_eq!(snapshot.messages[1].origin, MessageOrigin::Bot);
        assert_eq!(snapshot.messages[1].content, "Hi there!");
        assert!(!snapshot.awaiting_reply);
        assert!(!snapshot.bot_typing);
        assert_eq!(controller.stats().turns_completed, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn blank_input_is_ignored() {
        let backend = Arc::new(ScriptedBackend::default());
        let controller = controller(&backend);

        controller.submit("").await;
        controller.submit("   \t  ").await;

        assert_eq!(controller.message_count(), 0);
        assert!(!controller.is_awaiting_reply());
        assert!(backend.sent().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn raw_text_is_sent_and_stored() {
        let backend = Arc::new(ScriptedBackend::default());
        let controller = controller(&backend);

        controller.submit("  padded  ").await;

        assert_eq!(backend.sent(), vec!["  padded  ".to_string()]);
        assert_eq!(controller.snapshot().messages[0].content, "  padded  ");
    }

    #[tokio::test(start_paused = true)]
    async fn submit_clears_pending_input() {
        let backend = Arc::new(ScriptedBackend::default());
        let controller = controller(&backend);

        controller.set_pending_input("Hello");
        assert_eq!(controller.pending_input(), "Hello");
        controller.submit("Hello").await;
        assert_eq!(controller.pending_input(), "");
    }

    #[tokio::test(start_paused = true)]
    async fn reply_delay_is_observed_on_success() {
        let backend = Arc::new(ScriptedBackend::with_reply(Ok(ChatResponse::new("hi"))));
        let controller = controller(&backend);

        let before = tokio::time::Instant::now();
        controller.submit("Hello").await;
        assert_eq!(before.elapsed(), DEFAULT_REPLY_DELAY);
    }

    #[tokio::test(start_paused = true)]
    async fn error_notice_is_appended_without_delay() {
        let backend = Arc::new(ScriptedBackend::with_reply(Err(Error::connection(
            "refused", None,
        ))));
        let controller = controller(&backend);

        let before = tokio::time::Instant::now();
        controller.submit("Hello").await;
        assert_eq!(before.elapsed(), Duration::ZERO);

        let snapshot = controller.snapshot();
        assert_eq!(snapshot.messages.len(), 2);
        assert_eq!(snapshot.messages[1].content, CONNECTION_ERROR_NOTICE);
        assert!(!snapshot.awaiting_reply);
        assert!(!snapshot.bot_typing);
        assert_eq!(controller.stats().failed_turns, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn server_error_maps_to_server_notice() {
        let backend = Arc::new(ScriptedBackend::with_reply(Err(Error::internal_server(
            "Chat error: model exploded",
        ))));
        let controller = controller(&backend);

        controller.submit("Hello").await;

        assert_eq!(
            controller.snapshot().messages[1].content,
            SERVER_ERROR_NOTICE
        );
    }

    #[tokio::test(start_paused = true)]
    async fn other_errors_map_to_generic_notice() {
        let backend = Arc::new(ScriptedBackend::with_reply(Err(Error::api(
            404,
            "no such route",
        ))));
        let controller = controller(&backend);

        controller.submit("Hello").await;

        assert_eq!(
            controller.snapshot().messages[1].content,
            GENERIC_ERROR_NOTICE
        );
    }

    #[tokio::test(start_paused = true)]
    async fn long_reply_is_truncated() {
        let reply = "y".repeat(MAX_BOT_CONTENT_CHARS + 1);
        let backend = Arc::new(ScriptedBackend::with_reply(Ok(ChatResponse::new(reply))));
        let controller = controller(&backend);

        controller.submit("Hello").await;

        let expected = format!("{}{}", "y".repeat(MAX_BOT_CONTENT_CHARS), TRUNCATION_MARKER);
        assert_eq!(controller.snapshot().messages[1].content, expected);
    }

    #[tokio::test(start_paused = true)]
    async fn awaiting_reply_holds_through_the_delay() {
        let backend = Arc::new(ScriptedBackend::with_reply(Ok(ChatResponse::new("hi"))));
        let controller = Arc::new(controller(&backend));

        let task = {
            let controller = Arc::clone(&controller);
            tokio::spawn(async move { controller.submit("Hello").await })
        };
        while !controller.is_awaiting_reply() {
            tokio::task::yield_now().await;
        }

        // The backend has answered; the turn is parked in the reply delay.
        let snapshot = controller.snapshot();
        assert_eq!(snapshot.messages.len(), 1);
        assert!(snapshot.awaiting_reply);
        assert!(snapshot.bot_typing);

        task.await.unwrap();
        let snapshot = controller.snapshot();
        assert_eq!(snapshot.messages.len(), 2);
        assert!(!snapshot.awaiting_reply);
        assert!(!snapshot.bot_typing);
    }

    #[tokio::test(start_paused = true)]
    async fn second_submit_is_rejected_while_in_flight() {
        let backend = Arc::new(ScriptedBackend::with_reply(Ok(ChatResponse::new("hi"))));
        let controller = Arc::new(controller(&backend));

        let task = {
            let controller = Arc::clone(&controller);
            tokio::spawn(async move { controller.submit("first").await })
        };
        while !controller.is_awaiting_reply() {
            tokio::task::yield_now().await;
        }

        controller.submit("second").await;
        task.await.unwrap();

        let snapshot = controller.snapshot();
        assert_eq!(snapshot.messages.len(), 2);
        assert_eq!(snapshot.messages[0].content, "first");
        assert_eq!(backend.sent(), vec!["first".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn reset_clears_messages_and_flags() {
        let backend = Arc::new(ScriptedBackend::default());
        let controller = controller(&backend);

        controller.submit("Hello").await;
        controller.set_pending_input("half-typed");
        assert_eq!(controller.message_count(), 2);

        controller.reset().await;

        let snapshot = controller.snapshot();
        assert!(snapshot.messages.is_empty());
        assert_eq!(snapshot.pending_input, "");
        assert!(!snapshot.awaiting_reply);
        assert!(!snapshot.bot_typing);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_reset_leaves_state_unchanged() {
        let backend = Arc::new(ScriptedBackend::default());
        backend.push_reset(Err(Error::connection("refused", None)));
        let controller = controller(&backend);

        controller.submit("Hello").await;
        let before = controller.snapshot();

        controller.reset().await;

        let after = controller.snapshot();
        assert_eq!(after.messages, before.messages);
        assert_eq!(after.awaiting_reply, before.awaiting_reply);
        assert_eq!(after.bot_typing, before.bot_typing);
    }

    #[tokio::test(start_paused = true)]
    async fn reset_discards_in_flight_reply() {
        let backend = Arc::new(ScriptedBackend::with_reply(Ok(ChatResponse::new(
            "stale reply",
        ))));
        let controller = Arc::new(controller(&backend));

        let task = {
            let controller = Arc::clone(&controller);
            tokio::spawn(async move { controller.submit("Hello").await })
        };
        while !controller.is_awaiting_reply() {
            tokio::task::yield_now().await;
        }

        // Reset lands while the turn is parked in the reply delay.
        controller.reset().await;
        task.await.unwrap();

        let snapshot = controller.snapshot();
        assert!(snapshot.messages.is_empty());
        assert!(!snapshot.awaiting_reply);
        assert!(!snapshot.bot_typing);
    }

    #[tokio::test(start_paused = true)]
    async fn each_cycle_appends_exactly_two_messages() {
        let backend = Arc::new(ScriptedBackend::default());
        backend.push_reply(Ok(ChatResponse::new("one")));
        backend.push_reply(Err(Error::internal_server("boom")));
        backend.push_reply(Ok(ChatResponse::new("three")));
        let controller = controller(&backend);

        for (i, expected) in [2, 4, 6].iter().enumerate() {
            controller.submit(&format!("message {}", i)).await;
            assert_eq!(controller.message_count(), *expected);
        }

        let stats = controller.stats();
        assert_eq!(stats.user_messages, 3);
        assert_eq!(stats.bot_messages, 3);
        assert_eq!(stats.turns_completed, 2);
        assert_eq!(stats.failed_turns, 1);
    }

    #[test]
    fn notice_classification() {
        assert_eq!(
            error_notice(&Error::timeout("slow", None)),
            CONNECTION_ERROR_NOTICE
        );
        assert_eq!(
            error_notice(&Error::http_client("no response", None)),
            CONNECTION_ERROR_NOTICE
        );
        assert_eq!(
            error_notice(&Error::internal_server("boom")),
            SERVER_ERROR_NOTICE
        );
        assert_eq!(
            error_notice(&Error::service_unavailable("overloaded")),
            GENERIC_ERROR_NOTICE
        );
        assert_eq!(
            error_notice(&Error::serialization("bad body", None)),
            GENERIC_ERROR_NOTICE
        );
    }
}
