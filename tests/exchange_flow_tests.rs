use charla::api::{HttpBackend, PayloadField};
use charla::core::action::{Action, Effect, update};
use charla::core::message::{CONNECTION_ERROR_TEXT, MessageKind, Sender, UPSTREAM_CONFIG_TEXT};
use charla::core::state::App;
use charla::core::thread::Body;
use charla::tui::exchange;
use serde_json::json;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

// ============================================================================
// Helper Functions
// ============================================================================

async fn server_replying(status: u16, body: serde_json::Value) -> MockServer {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(&mock_server)
        .await;
    mock_server
}

/// Submit `text` and return the opened ticket
fn submit(app: &mut App, text: &str) -> u64 {
    match update(app, Action::Submit(text.to_string())) {
        Effect::SpawnRequest { ticket, .. } => ticket,
        other => panic!("Expected SpawnRequest, got {:?}", other),
    }
}

/// One full exchange: submit, run the request, apply the settle
async fn round_trip(app: &mut App, backend: &HttpBackend, text: &str) {
    let ticket = submit(app, text);
    let settled = exchange(backend, ticket, text).await;
    assert_eq!(update(app, settled), Effect::None);
}

// ============================================================================
// Flows
// ============================================================================

#[tokio::test]
async fn test_full_exchange_renders_reply() {
    let server = server_replying(200, json!({ "response": "# Hi\nHow can I help?" })).await;
    let backend = HttpBackend::new(format!("{}/chat", server.uri()), PayloadField::Message);
    let mut app = App::init();

    round_trip(&mut app, &backend, "Plan a weekend trip to Lisbon").await;

    assert!(!app.is_busy());
    assert!(!app.thread.is_typing());
    assert!(!app.welcome_visible);
    assert_eq!(app.current_title(), "Plan a weekend trip to Lisbon");

    let nodes: Vec<_> = app.thread.messages().collect();
    assert_eq!(nodes.len(), 2);
    assert_eq!(nodes[0].sender, Sender::User);
    assert_eq!(
        nodes[0].body,
        Body::Literal("Plan a weekend trip to Lisbon".to_string())
    );
    assert_eq!(nodes[1].sender, Sender::Bot);
    assert_eq!(nodes[1].body, Body::Markup("# Hi\nHow can I help?".to_string()));

    let session = app.sessions.current().unwrap();
    assert_eq!(session.messages.len(), 2);
}

#[tokio::test]
async fn test_typed_error_uses_template_not_server_text() {
    let server = server_replying(
        200,
        json!({ "error": "model xyz not found, key sk-123", "error_type": "api_error" }),
    )
    .await;
    let backend = HttpBackend::new(format!("{}/chat", server.uri()), PayloadField::Message);
    let mut app = App::init();

    round_trip(&mut app, &backend, "Hello").await;

    let reply = app.thread.messages().last().unwrap();
    assert_eq!(reply.kind, MessageKind::Error);
    assert_eq!(reply.body, Body::Literal(UPSTREAM_CONFIG_TEXT.to_string()));
    assert!(!reply.body.text().contains("sk-123"));
}

#[tokio::test]
async fn test_server_failure_renders_connection_error_and_unlocks() {
    let server = server_replying(503, json!({ "error": "unavailable" })).await;
    let backend = HttpBackend::new(format!("{}/chat", server.uri()), PayloadField::Message);
    let mut app = App::init();

    round_trip(&mut app, &backend, "Hello").await;

    let reply = app.thread.messages().last().unwrap();
    assert_eq!(reply.body, Body::Literal(CONNECTION_ERROR_TEXT.to_string()));
    assert!(app.can_send("Try again"));
}

#[tokio::test]
async fn test_reply_after_switch_is_kept_in_origin_session() {
    let server = server_replying(200, json!({ "response": "Late answer" })).await;
    let backend = HttpBackend::new(format!("{}/chat", server.uri()), PayloadField::Message);
    let mut app = App::init();
    let origin = app.sessions.active_id().unwrap().to_string();

    let ticket = submit(&mut app, "First question");
    assert_eq!(update(&mut app, Action::NewSession), Effect::ClearInput);

    let settled = exchange(&backend, ticket, "First question").await;
    update(&mut app, settled);

    assert!(!app.is_busy());
    assert!(app.thread.is_empty());
    assert!(app.welcome_visible);
    let origin_session = app.sessions.get(&origin).unwrap();
    assert_eq!(origin_session.messages.len(), 2);
    assert_eq!(origin_session.messages[1].content, "Late answer");
}

#[tokio::test]
async fn test_consecutive_exchanges_share_one_session() {
    let server = server_replying(200, json!({ "response": "ok" })).await;
    let backend = HttpBackend::new(format!("{}/chat", server.uri()), PayloadField::Message);
    let mut app = App::init();

    round_trip(&mut app, &backend, "one").await;
    round_trip(&mut app, &backend, "two").await;

    assert_eq!(app.sessions.len(), 1);
    assert_eq!(app.current_title(), "one");
    assert_eq!(app.thread.messages().count(), 4);
}
