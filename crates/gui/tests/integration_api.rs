//! Integration tests for the completion API client and the background worker.
//!
//! A small axum app stands in for the OpenAI endpoints:
//! `GET /v1/models` accepts only the key `good`, and
//! `POST /v1/chat/completions` echoes the last user message
//! (or fails with 500 for the key `boom`).

use std::net::SocketAddr;
use std::time::{Duration, Instant};

use axum::{
    http::{header, HeaderMap, StatusCode},
    response::Json,
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};

use oracle_gui_lib::ai::{ApiClient, ApiError, ApiEvent, ApiWorker};
use oracle_gui_lib::state::chat::{ChatState, APOLOGY};
use oracle_gui_lib::state::console::ConsoleLog;
use oracle_gui_lib::state::settings::ApiSettings;
use shared::{ChatCompletionRequest, ChatMessage, KeyCheck, Role};

// ── Fake API ─────────────────────────────────────────────────

fn bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

async fn models(headers: HeaderMap) -> StatusCode {
    match bearer(&headers) {
        Some("good") => StatusCode::OK,
        _ => StatusCode::UNAUTHORIZED,
    }
}

async fn completions(
    headers: HeaderMap,
    Json(request): Json<ChatCompletionRequest>,
) -> Result<Json<Value>, StatusCode> {
    if bearer(&headers) == Some("boom") {
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }
    let last_user = request
        .messages
        .iter()
        .rev()
        .find(|m| m.role == Role::User)
        .map(|m| m.content.clone())
        .unwrap_or_default();

    Ok(Json(json!({
        "choices": [
            { "message": { "role": "assistant", "content": format!("  echo: {last_user}\n") } }
        ]
    })))
}

fn fake_api() -> Router {
    Router::new()
        .route("/v1/models", get(models))
        .route("/v1/chat/completions", post(completions))
}

async fn spawn_fake_api() -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, fake_api()).await.unwrap();
    });
    addr
}

/// Fake API on its own runtime, for tests that drive the blocking worker
struct FakeServer {
    _runtime: tokio::runtime::Runtime,
    addr: SocketAddr,
}

impl FakeServer {
    fn start() -> Self {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let addr = runtime.block_on(spawn_fake_api());
        Self {
            _runtime: runtime,
            addr,
        }
    }

    fn base_url(&self) -> String {
        format!("http://{}/v1", self.addr)
    }
}

fn request(text: &str) -> ChatCompletionRequest {
    ChatCompletionRequest {
        model: shared::DEFAULT_MODEL.to_string(),
        messages: vec![ChatMessage::system("be brief"), ChatMessage::user(text)],
        max_tokens: shared::DEFAULT_MAX_TOKENS,
    }
}

/// Poll the worker until `count` events arrived or the deadline passed
fn wait_for_events(worker: &ApiWorker, count: usize) -> Vec<ApiEvent> {
    let deadline = Instant::now() + Duration::from_secs(10);
    let mut events = Vec::new();
    while events.len() < count && Instant::now() < deadline {
        events.extend(worker.poll());
        std::thread::sleep(Duration::from_millis(10));
    }
    events
}

/// Address nothing listens on
fn closed_port_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/v1")
}

// ── ApiClient ────────────────────────────────────────────────

#[tokio::test]
async fn test_check_key_valid_and_invalid() {
    let addr = spawn_fake_api().await;
    let client = ApiClient::new(format!("http://{addr}/v1"));

    assert_eq!(client.check_key("good").await.unwrap(), KeyCheck::Valid);
    assert_eq!(
        client.check_key("nope").await.unwrap(),
        KeyCheck::Invalid { status: 401 }
    );
}

#[tokio::test]
async fn test_complete_returns_trimmed_reply() {
    let addr = spawn_fake_api().await;
    let client = ApiClient::new(format!("http://{addr}/v1/"));

    let reply = client
        .complete("good", &request("Will I travel?"))
        .await
        .unwrap();
    assert_eq!(reply, "echo: Will I travel?");
}

#[tokio::test]
async fn test_complete_server_error_is_status() {
    let addr = spawn_fake_api().await;
    let client = ApiClient::new(format!("http://{addr}/v1"));

    let err = client.complete("boom", &request("hi")).await.unwrap_err();
    assert!(matches!(err, ApiError::Status(500)));
    assert_eq!(err.to_string(), "HTTP error! status: 500");
}

#[tokio::test]
async fn test_unreachable_server_is_transport_error() {
    let client = ApiClient::new(closed_port_url());
    let err = client.check_key("good").await.unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
}

// ── Worker + chat flow ───────────────────────────────────────

fn settings_for(server: &FakeServer) -> ApiSettings {
    ApiSettings {
        base_url: server.base_url(),
        ..ApiSettings::default()
    }
}

#[test]
fn test_worker_key_check_flow() {
    let server = FakeServer::start();
    let settings = settings_for(&server);
    let mut worker = ApiWorker::new().unwrap();
    let mut chat = ChatState::default();
    let mut console = ConsoleLog::default();

    chat.api_key = "good".into();
    assert!(chat.test_api_key(&settings, &mut console, &mut worker));
    assert_eq!(console.last(), Some("Testing API key..."));
    for event in wait_for_events(&worker, 1) {
        chat.apply(event, &mut console, Instant::now());
    }
    assert_eq!(console.last(), Some("API key is valid!"));

    chat.api_key = "bad".into();
    chat.test_api_key(&settings, &mut console, &mut worker);
    for event in wait_for_events(&worker, 1) {
        chat.apply(event, &mut console, Instant::now());
    }
    assert_eq!(
        console.last(),
        Some("API key is invalid. Please check and try again.")
    );
}

#[test]
fn test_worker_send_message_flow() {
    let server = FakeServer::start();
    let settings = settings_for(&server);
    let mut worker = ApiWorker::new().unwrap();
    let mut chat = ChatState::default();
    let mut console = ConsoleLog::default();

    chat.api_key = "good".into();
    chat.input = "Will I be lucky?".into();
    assert!(chat.send_message(&settings, &mut console, &mut worker));
    assert!(chat.is_loading());
    assert!(chat.input.is_empty());

    let events = wait_for_events(&worker, 1);
    assert_eq!(events.len(), 1);
    for event in events {
        chat.apply(event, &mut console, Instant::now());
    }

    assert!(!chat.is_loading());
    assert_eq!(
        console.lines(),
        &[
            "Sending message to OpenAI API...".to_string(),
            "Received response from OpenAI API".to_string(),
        ]
    );
    assert_eq!(chat.messages.len(), 2);
    assert_eq!(chat.messages[0].text, "Will I be lucky?");
    assert_eq!(chat.messages[1].text, "echo: Will I be lucky?");
    assert!(!chat.messages[1].is_error);
}

#[test]
fn test_worker_failed_completion_shows_apology() {
    let server = FakeServer::start();
    let settings = settings_for(&server);
    let mut worker = ApiWorker::new().unwrap();
    let mut chat = ChatState::default();
    let mut console = ConsoleLog::default();

    chat.api_key = "boom".into();
    chat.input = "What awaits me?".into();
    chat.send_message(&settings, &mut console, &mut worker);
    for event in wait_for_events(&worker, 1) {
        chat.apply(event, &mut console, Instant::now());
    }

    assert_eq!(console.last(), Some("Error: HTTP error! status: 500"));
    let last = chat.messages.last().unwrap();
    assert!(last.is_error);
    assert_eq!(last.text, APOLOGY);
    assert_eq!(chat.pending(), 0);
}

#[test]
fn test_worker_unreachable_key_check_logs_error() {
    let settings = ApiSettings {
        base_url: closed_port_url(),
        ..ApiSettings::default()
    };
    let mut worker = ApiWorker::new().unwrap();
    let mut chat = ChatState::default();
    let mut console = ConsoleLog::default();

    chat.api_key = "good".into();
    chat.test_api_key(&settings, &mut console, &mut worker);
    for event in wait_for_events(&worker, 1) {
        chat.apply(event, &mut console, Instant::now());
    }

    let last = console.last().unwrap();
    assert!(last.starts_with("Error testing API key: "), "got {last}");
}

#[test]
fn test_worker_waker_runs_after_each_job() {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    let server = FakeServer::start();
    let settings = settings_for(&server);
    let mut worker = ApiWorker::new().unwrap();
    let wakes = Arc::new(AtomicUsize::new(0));
    let counter = wakes.clone();
    worker.set_waker(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    let mut chat = ChatState::default();
    let mut console = ConsoleLog::default();
    chat.api_key = "good".into();
    chat.test_api_key(&settings, &mut console, &mut worker);
    chat.input = "one".into();
    chat.send_message(&settings, &mut console, &mut worker);

    let events = wait_for_events(&worker, 2);
    assert_eq!(events.len(), 2);

    // The waker fires right after the send, so give it a moment
    let deadline = Instant::now() + Duration::from_secs(5);
    while wakes.load(Ordering::SeqCst) < 2 && Instant::now() < deadline {
        std::thread::sleep(Duration::from_millis(5));
    }
    assert_eq!(wakes.load(Ordering::SeqCst), 2);
}
