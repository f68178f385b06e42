use anyhow::Result;
use ratatui::layout::Rect;
use tokio::task::JoinHandle;

use crate::backend::{BackendClient, ChatRequest, ChatResponse};
use crate::message::{self, Message, Sender};
use crate::provider::Provider;

/// Reply shown when the backend answers without a `response` field.
pub const FALLBACK_REPLY: &str = "Sorry, I encountered an error.";

/// The send gate: at most one request is in flight at a time. The
/// provider is captured at send time so the reply is labeled with the
/// provider it was actually asked of, even if the user switches tabs
/// while waiting.
pub enum RequestState {
    Idle,
    Pending {
        handle: JoinHandle<Result<ChatResponse>>,
        provider: Provider,
    },
}

pub struct App {
    pub should_quit: bool,

    // Conversation state
    pub messages: Vec<Message>,
    next_message_id: u64,

    // UI state
    pub draft: String,
    pub draft_cursor: usize,
    pub selected_provider: Provider,
    pub chat_scroll: u16,
    pub chat_height: u16,
    pub chat_width: u16,
    pub animation_frame: u8,

    // Provider tab areas for mouse hit-testing (updated during render)
    pub tab_areas: Vec<(Rect, Provider)>,

    pub request: RequestState,
    pub client: BackendClient,
}

impl App {
    pub fn new(client: BackendClient, provider: Provider) -> Self {
        Self {
            should_quit: false,
            messages: Vec::new(),
            next_message_id: 1,
            draft: String::new(),
            draft_cursor: 0,
            selected_provider: provider,
            chat_scroll: 0,
            chat_height: 0,
            chat_width: 0,
            animation_frame: 0,
            tab_areas: Vec::new(),
            request: RequestState::Idle,
            client,
        }
    }

    pub fn is_busy(&self) -> bool {
        matches!(self.request, RequestState::Pending { .. })
    }

    /// Provider the in-flight request was sent to, if any.
    pub fn pending_provider(&self) -> Option<Provider> {
        match &self.request {
            RequestState::Pending { provider, .. } => Some(*provider),
            RequestState::Idle => None,
        }
    }

    fn next_id(&mut self) -> u64 {
        let id = self.next_message_id;
        self.next_message_id += 1;
        id
    }

    fn push_user_message(&mut self, text: String) {
        let message = Message {
            id: self.next_id(),
            text,
            sender: Sender::User,
            provider: None,
            timestamp: message::local_timestamp(),
        };
        self.messages.push(message);
    }

    fn push_ai_message(&mut self, text: String, provider: Provider) {
        let message = Message {
            id: self.next_id(),
            text,
            sender: Sender::Ai,
            provider: Some(provider.id().to_string()),
            timestamp: message::local_timestamp(),
        };
        self.messages.push(message);
    }

    /// Request payload for the current draft: the raw text, the wire id
    /// of the selected provider, and the history as it stands before
    /// the new user message is appended.
    pub fn build_request(&self) -> ChatRequest {
        ChatRequest {
            message: self.draft.clone(),
            provider: self.selected_provider.id().to_string(),
            conversation_history: self.messages.clone(),
        }
    }

    /// Dispatch the draft. A whitespace-only draft or an in-flight
    /// request makes this a no-op.
    pub fn send_message(&mut self) {
        if self.draft.trim().is_empty() || self.is_busy() {
            return;
        }

        let request = self.build_request();
        let client = self.client.clone();

        let draft = std::mem::take(&mut self.draft);
        self.push_user_message(draft);
        self.draft_cursor = 0;

        self.request = RequestState::Pending {
            handle: tokio::spawn(async move { client.chat(&request).await }),
            provider: self.selected_provider,
        };

        self.scroll_chat_to_bottom();
    }

    /// Observe a finished request, if any. Called from the event loop,
    /// so completion latency is bounded by the tick interval.
    pub async fn poll_response(&mut self) {
        let finished = matches!(
            &self.request,
            RequestState::Pending { handle, .. } if handle.is_finished()
        );
        if !finished {
            return;
        }

        if let RequestState::Pending { handle, provider } =
            std::mem::replace(&mut self.request, RequestState::Idle)
        {
            // A panicked or aborted task counts as an ordinary failure.
            let outcome = match handle.await {
                Ok(result) => result,
                Err(join_error) => Err(join_error.into()),
            };
            self.apply_response(outcome, provider);
        }
    }

    /// Fold a request outcome into the conversation. Success uses the
    /// payload text, or the fallback reply when the field is missing;
    /// every failure collapses into one diagnostic bubble.
    pub fn apply_response(&mut self, outcome: Result<ChatResponse>, provider: Provider) {
        self.request = RequestState::Idle;

        let text = match outcome {
            Ok(payload) => payload
                .response
                .unwrap_or_else(|| FALLBACK_REPLY.to_string()),
            Err(_) => format!(
                "Failed to reach the chat backend. Make sure the server is running on {}",
                self.client.base_url()
            ),
        };

        self.push_ai_message(text, provider);
        self.scroll_chat_to_bottom();
    }

    /// Abort any in-flight request so a late reply cannot land after
    /// teardown.
    pub fn abort_pending(&mut self) {
        if let RequestState::Pending { handle, .. } =
            std::mem::replace(&mut self.request, RequestState::Idle)
        {
            handle.abort();
        }
    }

    // Provider selection

    pub fn select_next_provider(&mut self) {
        self.step_provider(1);
    }

    pub fn select_prev_provider(&mut self) {
        self.step_provider(-1);
    }

    fn step_provider(&mut self, step: isize) {
        let providers = Provider::all();
        let current = providers
            .iter()
            .position(|p| *p == self.selected_provider)
            .unwrap_or(0);
        let next = (current as isize + step).rem_euclid(providers.len() as isize) as usize;
        self.selected_provider = providers[next];
    }

    // Animation and scrolling

    /// Advance the typing indicator (driven by the tick event).
    pub fn tick_animation(&mut self) {
        if self.is_busy() {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
    }

    pub fn scroll_up(&mut self) {
        self.chat_scroll = self.chat_scroll.saturating_sub(1);
    }

    pub fn scroll_down(&mut self) {
        self.chat_scroll = self.chat_scroll.saturating_add(1);
    }

    pub fn scroll_half_page_up(&mut self) {
        self.chat_scroll = self.chat_scroll.saturating_sub(self.chat_height / 2);
    }

    pub fn scroll_half_page_down(&mut self) {
        self.chat_scroll = self.chat_scroll.saturating_add(self.chat_height / 2);
    }

    /// Pin the chat to its newest entry, accounting for line wrapping
    /// in the cached viewport size.
    pub fn scroll_chat_to_bottom(&mut self) {
        let wrap_width = if self.chat_width > 0 {
            self.chat_width as usize
        } else {
            50
        };

        let mut total_lines: u16 = 0;

        for message in &self.messages {
            total_lines += 1; // sender/provider label line
            for line in message.text.lines() {
                // Character count, not byte length, for UTF-8 text
                let chars = line.chars().count();
                if chars == 0 {
                    total_lines += 1;
                } else {
                    total_lines += ((chars / wrap_width) + 1) as u16;
                }
            }
            total_lines += 1; // blank separator
        }

        if self.is_busy() {
            total_lines += 2; // provider label + typing indicator
        }

        let visible = if self.chat_height > 0 {
            self.chat_height
        } else {
            20
        };

        self.chat_scroll = total_lines.saturating_sub(visible);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    fn test_app() -> App {
        App::new(
            BackendClient::new("http://localhost:8000"),
            Provider::ChatGpt,
        )
    }

    #[tokio::test]
    async fn test_whitespace_draft_is_not_sent() {
        let mut app = test_app();
        app.draft = "   \n ".to_string();

        app.send_message();

        assert!(app.messages.is_empty());
        assert!(!app.is_busy());
        assert_eq!(app.draft, "   \n ");
    }

    #[tokio::test]
    async fn test_send_while_in_flight_is_a_no_op() {
        let mut app = test_app();
        app.draft = "first".to_string();
        app.send_message();
        assert_eq!(app.messages.len(), 1);
        assert!(app.is_busy());

        app.draft = "second".to_string();
        app.send_message();

        assert_eq!(app.messages.len(), 1);
        assert_eq!(app.draft, "second");

        app.abort_pending();
    }

    #[tokio::test]
    async fn test_successful_response_grows_history_by_two() {
        let mut app = test_app();
        app.draft = "Hi there".to_string();
        app.send_message();
        app.abort_pending();

        app.apply_response(
            Ok(ChatResponse {
                response: Some("Hello!".to_string()),
            }),
            Provider::ChatGpt,
        );

        assert_eq!(app.messages.len(), 2);

        let user = &app.messages[0];
        assert_eq!(user.sender, Sender::User);
        assert_eq!(user.text, "Hi there");
        assert_eq!(user.provider, None);

        let reply = &app.messages[1];
        assert_eq!(reply.sender, Sender::Ai);
        assert_eq!(reply.text, "Hello!");
        assert_eq!(reply.provider.as_deref(), Some("chatgpt"));

        assert!(!app.is_busy());
    }

    #[tokio::test]
    async fn test_missing_response_field_falls_back_to_the_apology() {
        let mut app = test_app();
        app.draft = "Hi".to_string();
        app.send_message();
        app.abort_pending();

        app.apply_response(Ok(ChatResponse { response: None }), Provider::Grok);

        let reply = app.messages.last().unwrap();
        assert_eq!(reply.text, FALLBACK_REPLY);
        assert_eq!(reply.provider.as_deref(), Some("grok"));
    }

    #[tokio::test]
    async fn test_failures_surface_as_a_single_diagnostic_bubble() {
        let mut app = test_app();
        app.draft = "Hi".to_string();
        app.send_message();
        app.abort_pending();

        app.apply_response(Err(anyhow!("connection refused")), Provider::ChatGpt);

        let reply = app.messages.last().unwrap();
        assert_eq!(reply.sender, Sender::Ai);
        assert!(reply.text.contains("http://localhost:8000"));
        assert!(!app.is_busy());
    }

    #[test]
    fn test_request_history_excludes_the_message_being_sent() {
        let mut app = test_app();
        app.draft = "first question".to_string();

        let request = app.build_request();

        assert!(request.conversation_history.is_empty());
        assert_eq!(request.message, "first question");
        assert_eq!(request.provider, "chatgpt");
    }

    #[test]
    fn test_switching_provider_changes_the_request_provider_field() {
        let mut app = test_app();
        app.select_next_provider();
        app.draft = "hello".to_string();

        assert_eq!(app.build_request().provider, "grok");
    }

    #[test]
    fn test_provider_selection_wraps_in_both_directions() {
        let mut app = test_app();

        app.select_prev_provider();
        assert_eq!(app.selected_provider, Provider::OpenRouter);

        app.select_next_provider();
        assert_eq!(app.selected_provider, Provider::ChatGpt);
    }

    #[tokio::test]
    async fn test_message_ids_increase_monotonically() {
        let mut app = test_app();
        app.draft = "one".to_string();
        app.send_message();
        app.abort_pending();

        app.apply_response(
            Ok(ChatResponse {
                response: Some("two".to_string()),
            }),
            Provider::ChatGpt,
        );

        let ids: Vec<u64> = app.messages.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_scroll_pins_to_the_newest_entry() {
        let mut app = test_app();
        app.chat_width = 10;
        app.chat_height = 4;

        // "hello world" wraps to two lines at width 10, so each message
        // occupies label + 2 content lines + blank separator.
        for _ in 0..5 {
            app.push_user_message("hello world".to_string());
        }
        app.scroll_chat_to_bottom();

        assert_eq!(app.chat_scroll, 16);
    }
}
