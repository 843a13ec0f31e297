//! Gateway client and session view behavior against a mock backend.

use dj_console::api::{ApiErrorKind, ConsoleClient};
use dj_console::config::Config;
use dj_console::tui::events::UiEvent;
use dj_console::tui::state::AppState;
use dj_console::tui::update::update;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_config(base_url: &str) -> Config {
    Config {
        base_url: base_url.to_string(),
        provider: "spotify".to_string(),
    }
}

async fn mock_user(server: &MockServer, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/user"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

async fn mock_logout(server: &MockServer, ok: bool) {
    Mock::given(method("GET"))
        .and(path("/logout"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": ok })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn fetch_user_returns_logged_in_profile() {
    let server = MockServer::start().await;
    mock_user(
        &server,
        json!({"error": false, "name": "Alice", "kubeconfig": "apiVersion: v1..."}),
    )
    .await;

    let client = ConsoleClient::new(&server.uri());
    let doc = client.fetch_user().await.unwrap();

    assert!(doc.is_logged_in());
    assert_eq!(doc.name.as_deref(), Some("Alice"));
    assert_eq!(doc.kubeconfig.as_deref(), Some("apiVersion: v1..."));
}

#[tokio::test]
async fn fetch_user_anonymous_is_not_logged_in() {
    let server = MockServer::start().await;
    mock_user(&server, json!({"error": true})).await;

    let client = ConsoleClient::new(&server.uri());
    let doc = client.fetch_user().await.unwrap();

    assert!(!doc.is_logged_in());
}

#[tokio::test]
async fn fetch_user_http_error_is_status_kind() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let client = ConsoleClient::new(&server.uri());
    let err = client.fetch_user().await.unwrap_err();

    assert_eq!(err.kind, ApiErrorKind::Status);
    assert!(err.message.contains("500"));
}

#[tokio::test]
async fn fetch_user_html_body_is_decode_kind() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<html>login page</html>")
                .insert_header("content-type", "text/html"),
        )
        .mount(&server)
        .await;

    let client = ConsoleClient::new(&server.uri());
    let err = client.fetch_user().await.unwrap_err();

    assert_eq!(err.kind, ApiErrorKind::Decode);
}

#[tokio::test]
async fn fetch_user_unreachable_gateway_is_connect_kind() {
    // Grab a local address, then shut the server down so the port refuses.
    let server = MockServer::start().await;
    let uri = server.uri();
    drop(server);

    let client = ConsoleClient::new(&uri);
    let err = client.fetch_user().await.unwrap_err();

    assert_eq!(err.kind, ApiErrorKind::Connect);
}

#[tokio::test]
async fn logout_reports_ok_flag() {
    let server = MockServer::start().await;
    mock_logout(&server, true).await;

    let client = ConsoleClient::new(&server.uri());
    assert!(client.logout().await.unwrap().ok);
}

#[tokio::test]
async fn logout_refused_reports_not_ok() {
    let server = MockServer::start().await;
    mock_logout(&server, false).await;

    let client = ConsoleClient::new(&server.uri());
    assert!(!client.logout().await.unwrap().ok);
}

/// End-to-end view logic: fetch logs the session in, a refused logout keeps
/// it, a successful logout clears it.
#[tokio::test]
async fn session_view_flow_login_then_logout() {
    let server = MockServer::start().await;
    mock_user(
        &server,
        json!({"error": false, "name": "Alice", "kubeconfig": "apiVersion: v1..."}),
    )
    .await;

    let client = ConsoleClient::new(&server.uri());
    let mut state = AppState::new(test_config(&server.uri()));

    // Identity fetch resolves into the reducer.
    let result = client.fetch_user().await;
    update(&mut state, UiEvent::UserLoaded(result));
    assert!(state.session.is_logged_in());
    assert_eq!(
        state.session.profile().unwrap().name.as_deref(),
        Some("Alice")
    );

    // Gateway refuses the logout: session unchanged.
    mock_logout(&server, false).await;
    let result = client.logout().await;
    update(&mut state, UiEvent::LogoutFinished(result));
    assert!(state.session.is_logged_in());

    // Gateway accepts: session cleared.
    server.reset().await;
    mock_logout(&server, true).await;
    let result = client.logout().await;
    update(&mut state, UiEvent::LogoutFinished(result));
    assert!(!state.session.is_logged_in());
}
