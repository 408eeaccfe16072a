use std::time::{Duration, Instant};

use shared::{ChatCompletionRequest, KeyCheck};

use super::console::ConsoleLog;
use super::settings::ApiSettings;
use crate::ai::{ApiError, ApiEvent, ApiJob, Dispatch};

/// Reply shown in the chat when a completion fails
pub const APOLOGY: &str = "Sorry, there was an error processing your request.";

/// Role of a chat message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatRole {
    User,
    Assistant,
}

/// A single chat message
#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub text: String,
    pub is_error: bool,
    /// When an assistant reply arrived; drives the typewriter reveal
    pub arrived_at: Option<Instant>,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            text: text.into(),
            is_error: false,
            arrived_at: None,
        }
    }

    pub fn assistant(text: impl Into<String>, arrived_at: Instant) -> Self {
        Self {
            role: ChatRole::Assistant,
            text: text.into(),
            is_error: false,
            arrived_at: Some(arrived_at),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            text: text.into(),
            is_error: true,
            arrived_at: None,
        }
    }

    /// Prefix of the text revealed by `now`
    pub fn visible_text(&self, now: Instant, ms_per_char: u64) -> &str {
        let Some(arrived) = self.arrived_at else {
            return &self.text;
        };
        let shown = revealed_chars(now.saturating_duration_since(arrived), ms_per_char);
        match self.text.char_indices().nth(shown) {
            Some((byte, _)) => &self.text[..byte],
            None => &self.text,
        }
    }

    pub fn is_typing(&self, now: Instant, ms_per_char: u64) -> bool {
        self.visible_text(now, ms_per_char).len() < self.text.len()
    }
}

/// Characters revealed after `elapsed`; the first one shows immediately.
pub fn revealed_chars(elapsed: Duration, ms_per_char: u64) -> usize {
    if ms_per_char == 0 {
        return usize::MAX;
    }
    let steps = elapsed.as_millis() / ms_per_char as u128;
    usize::try_from(steps).unwrap_or(usize::MAX).saturating_add(1)
}

/// Chat panel state: history, inputs, and requests still in flight
#[derive(Default)]
pub struct ChatState {
    pub messages: Vec<ChatMessage>,
    pub input: String,
    pub api_key: String,
    pending: usize,
    next_request_id: u64,
}

impl ChatState {
    /// Number of completions sent but not yet answered
    pub fn pending(&self) -> usize {
        self.pending
    }

    pub fn is_loading(&self) -> bool {
        self.pending > 0
    }

    /// Validate the credential against the API.
    ///
    /// Returns whether a request was dispatched.
    pub fn test_api_key(
        &mut self,
        settings: &ApiSettings,
        console: &mut ConsoleLog,
        dispatcher: &mut impl Dispatch,
    ) -> bool {
        let api_key = self.api_key.trim();
        if api_key.is_empty() {
            console.log("Please enter an API key.");
            return false;
        }

        console.log("Testing API key...");
        let job = ApiJob::CheckKey {
            base_url: settings.base_url.clone(),
            api_key: api_key.to_string(),
        };
        if let Err(e) = dispatcher.dispatch(job) {
            console.log(format!("Error testing API key: {e}"));
            return false;
        }
        true
    }

    /// Send the current input to the completion API.
    ///
    /// Returns whether a request was dispatched.
    pub fn send_message(
        &mut self,
        settings: &ApiSettings,
        console: &mut ConsoleLog,
        dispatcher: &mut impl Dispatch,
    ) -> bool {
        let message = self.input.trim().to_string();
        if message.is_empty() {
            return false;
        }
        let api_key = self.api_key.trim().to_string();
        if api_key.is_empty() {
            console.log("Please enter an API key before sending a message.");
            return false;
        }

        let request = self.build_request(settings, &message);
        self.messages.push(ChatMessage::user(message));
        self.input.clear();

        console.log("Sending message to OpenAI API...");
        self.next_request_id += 1;
        self.pending += 1;
        let job = ApiJob::Complete {
            id: self.next_request_id,
            base_url: settings.base_url.clone(),
            api_key,
            request,
        };
        if let Err(e) = dispatcher.dispatch(job) {
            self.pending -= 1;
            self.push_failure(&e, console);
            return false;
        }
        true
    }

    /// System prompt, optional earlier turns, then the new message
    pub fn build_request(&self, settings: &ApiSettings, message: &str) -> ChatCompletionRequest {
        let mut messages = vec![shared::ChatMessage::system(settings.system_prompt.as_str())];
        if settings.send_history {
            messages.extend(
                self.messages
                    .iter()
                    .filter(|m| !m.is_error)
                    .map(|m| match m.role {
                        ChatRole::User => shared::ChatMessage::user(m.text.as_str()),
                        ChatRole::Assistant => shared::ChatMessage::assistant(m.text.as_str()),
                    }),
            );
        }
        messages.push(shared::ChatMessage::user(message));

        ChatCompletionRequest {
            model: settings.model.clone(),
            messages,
            max_tokens: settings.max_tokens,
        }
    }

    /// Apply a finished API call
    pub fn apply(&mut self, event: ApiEvent, console: &mut ConsoleLog, now: Instant) {
        match event {
            ApiEvent::KeyChecked(Ok(KeyCheck::Valid)) => console.log("API key is valid!"),
            ApiEvent::KeyChecked(Ok(KeyCheck::Invalid { status })) => {
                tracing::debug!("Key check returned status {status}");
                console.log("API key is invalid. Please check and try again.");
            }
            ApiEvent::KeyChecked(Err(e)) => console.log(format!("Error testing API key: {e}")),
            ApiEvent::Completed { id, result } => {
                self.pending = self.pending.saturating_sub(1);
                match result {
                    Ok(text) => {
                        console.log("Received response from OpenAI API");
                        self.messages.push(ChatMessage::assistant(text, now));
                    }
                    Err(e) => {
                        tracing::debug!("Completion {id} failed");
                        self.push_failure(&e, console);
                    }
                }
            }
        }
    }

    fn push_failure(&mut self, error: &ApiError, console: &mut ConsoleLog) {
        console.log(format!("Error: {error}"));
        self.messages.push(ChatMessage::error(APOLOGY));
    }

    pub fn clear(&mut self) {
        self.messages.clear();
        self.input.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::ApiWorker;

    impl Dispatch for Vec<ApiJob> {
        fn dispatch(&mut self, job: ApiJob) -> Result<(), ApiError> {
            self.push(job);
            Ok(())
        }
    }

    fn chat_with(input: &str, key: &str) -> ChatState {
        ChatState {
            input: input.to_string(),
            api_key: key.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_message_sends_nothing() {
        let mut chat = chat_with("   ", "sk-test");
        let mut console = ConsoleLog::default();
        let mut jobs: Vec<ApiJob> = Vec::new();

        assert!(!chat.send_message(&ApiSettings::default(), &mut console, &mut jobs));
        assert!(jobs.is_empty());
        assert!(chat.messages.is_empty());
        assert!(console.lines().is_empty());
    }

    #[test]
    fn test_missing_key_blocks_send_and_keeps_input() {
        let mut chat = chat_with("Will I travel?", "  ");
        let mut console = ConsoleLog::default();
        let mut jobs: Vec<ApiJob> = Vec::new();

        assert!(!chat.send_message(&ApiSettings::default(), &mut console, &mut jobs));
        assert!(jobs.is_empty());
        assert!(chat.messages.is_empty());
        assert_eq!(chat.input, "Will I travel?");
        assert_eq!(
            console.last(),
            Some("Please enter an API key before sending a message.")
        );
    }

    #[test]
    fn test_missing_key_blocks_key_check() {
        let mut chat = chat_with("", "");
        let mut console = ConsoleLog::default();
        let mut jobs: Vec<ApiJob> = Vec::new();

        assert!(!chat.test_api_key(&ApiSettings::default(), &mut console, &mut jobs));
        assert!(jobs.is_empty());
        assert_eq!(console.lines(), ["Please enter an API key."]);
    }

    #[test]
    fn test_key_check_dispatches_trimmed_key() {
        let mut chat = chat_with("", " sk-abc ");
        let mut console = ConsoleLog::default();
        let mut jobs: Vec<ApiJob> = Vec::new();

        assert!(chat.test_api_key(&ApiSettings::default(), &mut console, &mut jobs));
        assert_eq!(console.lines(), ["Testing API key..."]);
        match jobs.as_slice() {
            [ApiJob::CheckKey { base_url, api_key }] => {
                assert_eq!(api_key, "sk-abc");
                assert_eq!(base_url, "https://api.openai.com/v1");
            }
            _ => panic!("expected one key check"),
        }
    }

    #[test]
    fn test_send_message_dispatches_completion() {
        let mut chat = chat_with("  What does the moon mean? ", "sk-abc");
        let mut console = ConsoleLog::default();
        let mut jobs: Vec<ApiJob> = Vec::new();
        let settings = ApiSettings::default();

        assert!(chat.send_message(&settings, &mut console, &mut jobs));
        assert!(chat.input.is_empty());
        assert_eq!(chat.pending(), 1);
        assert_eq!(chat.messages.len(), 1);
        assert_eq!(chat.messages[0].role, ChatRole::User);
        assert_eq!(chat.messages[0].text, "What does the moon mean?");
        assert_eq!(console.last(), Some("Sending message to OpenAI API..."));

        match jobs.as_slice() {
            [ApiJob::Complete { id, api_key, request, .. }] => {
                assert_eq!(*id, 1);
                assert_eq!(api_key, "sk-abc");
                assert_eq!(request.model, "gpt-3.5-turbo");
                assert_eq!(request.max_tokens, 500);
                assert_eq!(request.messages.len(), 2);
                assert_eq!(request.messages[0].role, shared::Role::System);
                assert_eq!(request.messages[1].content, "What does the moon mean?");
            }
            _ => panic!("expected one completion"),
        }
    }

    #[test]
    fn test_history_skips_error_replies() {
        let now = Instant::now();
        let mut chat = ChatState::default();
        chat.messages.push(ChatMessage::user("first"));
        chat.messages.push(ChatMessage::error(APOLOGY));
        chat.messages.push(ChatMessage::user("second"));
        chat.messages.push(ChatMessage::assistant("Pick a number", now));

        let request = chat.build_request(&ApiSettings::default(), "42");
        let contents: Vec<&str> = request.messages.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(&contents[1..], &["first", "second", "Pick a number", "42"]);
        assert_eq!(request.messages[3].role, shared::Role::Assistant);

        let single = ApiSettings {
            send_history: false,
            ..Default::default()
        };
        assert_eq!(chat.build_request(&single, "42").messages.len(), 2);
    }

    #[test]
    fn test_key_check_outcomes_logged() {
        let mut chat = ChatState::default();
        let mut console = ConsoleLog::default();
        let now = Instant::now();

        chat.apply(ApiEvent::KeyChecked(Ok(KeyCheck::Valid)), &mut console, now);
        assert_eq!(console.last(), Some("API key is valid!"));

        for status in [301, 401, 404, 500] {
            chat.apply(
                ApiEvent::KeyChecked(Ok(KeyCheck::from_status(status))),
                &mut console,
                now,
            );
            assert_eq!(
                console.last(),
                Some("API key is invalid. Please check and try again.")
            );
        }

        chat.apply(ApiEvent::KeyChecked(Err(ApiError::EmptyReply)), &mut console, now);
        assert_eq!(
            console.last(),
            Some("Error testing API key: response did not contain a message")
        );
        assert!(chat.messages.is_empty());
    }

    #[test]
    fn test_failed_completion_shows_apology() {
        let mut chat = chat_with("hello", "sk");
        let mut console = ConsoleLog::default();
        let mut jobs: Vec<ApiJob> = Vec::new();
        chat.send_message(&ApiSettings::default(), &mut console, &mut jobs);

        chat.apply(
            ApiEvent::Completed {
                id: 1,
                result: Err(ApiError::Status(429)),
            },
            &mut console,
            Instant::now(),
        );

        assert_eq!(chat.pending(), 0);
        assert_eq!(console.last(), Some("Error: HTTP error! status: 429"));
        let last = chat.messages.last().unwrap();
        assert!(last.is_error);
        assert_eq!(last.text, APOLOGY);
    }

    #[test]
    fn test_replies_append_in_arrival_order() {
        let mut chat = ChatState::default();
        chat.api_key = "sk".into();
        let mut console = ConsoleLog::default();
        let mut jobs: Vec<ApiJob> = Vec::new();
        let settings = ApiSettings::default();

        chat.input = "one".into();
        chat.send_message(&settings, &mut console, &mut jobs);
        chat.input = "two".into();
        chat.send_message(&settings, &mut console, &mut jobs);
        assert_eq!(chat.pending(), 2);
        assert!(chat.is_loading());

        let now = Instant::now();
        chat.apply(
            ApiEvent::Completed { id: 2, result: Ok("reply two".into()) },
            &mut console,
            now,
        );
        chat.apply(
            ApiEvent::Completed { id: 1, result: Ok("reply one".into()) },
            &mut console,
            now,
        );

        let texts: Vec<&str> = chat.messages.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, ["one", "two", "reply two", "reply one"]);
        assert!(!chat.is_loading());
        assert_eq!(console.last(), Some("Received response from OpenAI API"));
    }

    #[test]
    fn test_typewriter_reveal() {
        let start = Instant::now();
        let msg = ChatMessage::assistant("héllo", start);

        assert_eq!(msg.visible_text(start, 50), "h");
        assert_eq!(msg.visible_text(start + Duration::from_millis(50), 50), "hé");
        assert_eq!(msg.visible_text(start + Duration::from_millis(149), 50), "hél");
        assert!(msg.is_typing(start + Duration::from_millis(149), 50));
        assert_eq!(msg.visible_text(start + Duration::from_secs(5), 50), "héllo");
        assert!(!msg.is_typing(start + Duration::from_secs(5), 50));

        // Disabled effect and user messages show everything
        assert_eq!(msg.visible_text(start, 0), "héllo");
        assert_eq!(ChatMessage::user("abc").visible_text(start, 50), "abc");
    }

    #[test]
    fn test_clear_keeps_requests_in_flight() {
        let mut chat = chat_with("first", "sk-test");
        let mut console = ConsoleLog::default();
        let mut jobs: Vec<ApiJob> = Vec::new();
        chat.send_message(&ApiSettings::default(), &mut console, &mut jobs);
        chat.input = "draft".into();

        chat.clear();
        assert!(chat.messages.is_empty());
        assert!(chat.input.is_empty());
        assert_eq!(chat.pending(), 1);

        // A late reply still lands in the cleared history
        chat.apply(
            ApiEvent::Completed { id: 1, result: Ok("late".into()) },
            &mut console,
            Instant::now(),
        );
        assert_eq!(chat.messages.len(), 1);
        assert!(!chat.is_loading());
    }

    #[test]
    fn test_dropped_send_reports_failure() {
        let mut chat = chat_with("hello", "sk-test");
        let mut console = ConsoleLog::default();
        let mut no_worker: Option<ApiWorker> = None;

        assert!(!chat.send_message(&ApiSettings::default(), &mut console, &mut no_worker));
        assert!(!chat.is_loading());
        assert_eq!(chat.pending(), 0);

        let texts: Vec<(&str, bool)> = chat
            .messages
            .iter()
            .map(|m| (m.text.as_str(), m.is_error))
            .collect();
        assert_eq!(texts, [("hello", false), (APOLOGY, true)]);
        assert_eq!(
            console.lines(),
            &[
                "Sending message to OpenAI API...".to_string(),
                "Error: network worker is not running".to_string(),
            ]
        );
    }

    #[test]
    fn test_dropped_key_check_is_logged() {
        let mut chat = chat_with("", "sk-test");
        let mut console = ConsoleLog::default();
        let mut no_worker: Option<ApiWorker> = None;

        assert!(!chat.test_api_key(&ApiSettings::default(), &mut console, &mut no_worker));
        assert_eq!(
            console.last(),
            Some("Error testing API key: network worker is not running")
        );
    }
}
