// Integration tests for the SMS mockup console.
//
// These tests exercise the full system end-to-end using the library
// crate's public API. They verify that the API client, the orchestrator
// loop, the advice extractor, and the view-state layer work together
// correctly, driving the HTTP side against mocked endpoints.

use std::time::Duration;

use sms_console::advice::extract_advice;
use sms_console::api::{ApiClient, ApiError};
use sms_console::app::{self, AppState};
use sms_console::config::{ApiConfig, Config, UiConfig};
use sms_console::protocol::*;
use sms_console::tui::widgets::scheduled_run::report_lines;
use sms_console::tui::{apply_ui_update, ViewState};

use serde_json::json;
use tokio::sync::mpsc;

// ===========================================================================
// Test helpers
// ===========================================================================

/// Build a test-ready Config pointing at the given base URL.
fn inline_config(base_url: &str) -> Config {
    Config {
        api: ApiConfig {
            base_url: base_url.to_string(),
        },
        ui: UiConfig::default(),
    }
}

/// Channels for driving the orchestrator loop in tests.
struct Harness {
    cmd_tx: mpsc::Sender<UserCommand>,
    ui_rx: mpsc::Receiver<UiUpdate>,
    handle: tokio::task::JoinHandle<()>,
}

/// Spawn the orchestrator against the given base URL.
fn spawn_app(base_url: &str) -> Harness {
    let (cmd_tx, cmd_rx) = mpsc::channel(16);
    let (api_tx, api_rx) = mpsc::channel(16);
    let (ui_tx, ui_rx) = mpsc::channel(64);

    let state = AppState::new(inline_config(base_url), ApiClient::new(base_url), api_tx);
    let handle = tokio::spawn(async move {
        let _ = app::run(cmd_rx, api_rx, ui_tx, state).await;
    });

    Harness {
        cmd_tx,
        ui_rx,
        handle,
    }
}

/// Receive the next UiUpdate with a timeout so a regression hangs the
/// test visibly instead of forever.
async fn next_update(ui_rx: &mut mpsc::Receiver<UiUpdate>) -> UiUpdate {
    tokio::time::timeout(Duration::from_secs(5), ui_rx.recv())
        .await
        .expect("timed out waiting for UiUpdate")
        .expect("ui channel closed unexpectedly")
}

// ===========================================================================
// API client against mocked endpoints
// ===========================================================================

#[tokio::test]
async fn webhook_post_sends_phone_and_message() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/mockup-webhook")
        .match_body(mockito::Matcher::Json(json!({
            "phone": "555",
            "message": "hi"
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"advice": "'advice': 'ok'"}"#)
        .create_async()
        .await;

    let client = ApiClient::new(&server.url());
    let value = client.send_message("555", "hi").await.unwrap();

    assert_eq!(value, json!({"advice": "'advice': 'ok'"}));
    mock.assert_async().await;
}

#[tokio::test]
async fn webhook_non_json_body_is_wrapped_as_string() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/mockup-webhook")
        .with_status(200)
        .with_body("plain text reply")
        .create_async()
        .await;

    let client = ApiClient::new(&server.url());
    let value = client.send_message("555", "hi").await.unwrap();

    assert_eq!(value, json!("plain text reply"));
}

#[tokio::test]
async fn webhook_server_error_maps_to_status_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/mockup-webhook")
        .with_status(500)
        .create_async()
        .await;

    let client = ApiClient::new(&server.url());
    let err = client.send_message("555", "hi").await.unwrap_err();

    match err {
        ApiError::Status(status) => assert_eq!(status.as_u16(), 500),
        other => panic!("expected Status error, got {other:?}"),
    }
}

#[tokio::test]
async fn scheduled_run_deserializes_report() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/mockup-scheduled-run")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{
                "processed_users": 2,
                "messages": [
                    { "to": "+15550001111", "message": "water your crops" },
                    { "to": "+15550002222", "message": "rain expected" }
                ]
            }"#,
        )
        .create_async()
        .await;

    let client = ApiClient::new(&server.url());
    let report = client.scheduled_run().await.unwrap();

    assert_eq!(report.processed_users, 2);
    assert_eq!(report.messages.len(), 2);
    assert_eq!(report.messages[1].to, "+15550002222");
}

#[tokio::test]
async fn scheduled_run_malformed_report_is_decode_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/mockup-scheduled-run")
        .with_status(200)
        .with_body(r#"{"unexpected": true}"#)
        .create_async()
        .await;

    let client = ApiClient::new(&server.url());
    let err = client.scheduled_run().await.unwrap_err();

    assert!(matches!(err, ApiError::Decode(_)), "got {err:?}");
}

// ===========================================================================
// Orchestrator loop end-to-end
// ===========================================================================

#[tokio::test]
async fn one_send_appends_exactly_one_entry_and_clears_message_field() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/mockup-webhook")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"advice": "'advice': 'ok'"}"#)
        .create_async()
        .await;

    let mut harness = spawn_app(&server.url());

    // Mirror the form: the view starts with a typed phone and message.
    let mut view = ViewState::default();
    view.phone = "555".into();
    view.message = "hi".into();

    harness
        .cmd_tx
        .send(UserCommand::SendMessage {
            phone: "555".into(),
            message: "hi".into(),
        })
        .await
        .unwrap();

    let started = next_update(&mut harness.ui_rx).await;
    assert_eq!(started, UiUpdate::SendStarted);
    apply_ui_update(&mut view, started);

    let appended = next_update(&mut harness.ui_rx).await;
    match &appended {
        UiUpdate::ConversationAppended(entry) => {
            assert_eq!(entry.phone, "555");
            assert_eq!(entry.message, "hi");
            assert_eq!(entry.response, json!({"advice": "'advice': 'ok'"}));
        }
        other => panic!("expected ConversationAppended, got {other:?}"),
    }
    apply_ui_update(&mut view, appended);

    assert_eq!(view.conversation.len(), 1);
    assert!(view.message.is_empty(), "message field should be cleared");
    assert_eq!(view.phone, "555", "phone should be retained");

    harness.cmd_tx.send(UserCommand::Quit).await.unwrap();
    let _ = harness.handle.await;
}

#[tokio::test]
async fn failed_send_leaves_log_unchanged_and_sets_error() {
    // Nothing listens on port 1; the request fails at the transport level.
    let mut harness = spawn_app("http://127.0.0.1:1");

    let mut view = ViewState::default();

    harness
        .cmd_tx
        .send(UserCommand::SendMessage {
            phone: "555".into(),
            message: "hi".into(),
        })
        .await
        .unwrap();

    apply_ui_update(&mut view, next_update(&mut harness.ui_rx).await);

    let failed = next_update(&mut harness.ui_rx).await;
    match &failed {
        UiUpdate::SendFailed(msg) => assert!(!msg.is_empty(), "error string must be non-empty"),
        other => panic!("expected SendFailed, got {other:?}"),
    }
    apply_ui_update(&mut view, failed);

    assert!(view.conversation.is_empty(), "log length unchanged");
    assert!(view.error.is_some());

    harness.cmd_tx.send(UserCommand::Quit).await.unwrap();
    let _ = harness.handle.await;
}

#[tokio::test]
async fn scheduled_run_with_no_messages_shows_placeholder() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/mockup-scheduled-run")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"processed_users": 3, "messages": []}"#)
        .create_async()
        .await;

    let mut harness = spawn_app(&server.url());
    let mut view = ViewState::default();

    harness
        .cmd_tx
        .send(UserCommand::SimulateScheduledRun)
        .await
        .unwrap();

    let started = next_update(&mut harness.ui_rx).await;
    assert_eq!(started, UiUpdate::ScheduledRunStarted);
    apply_ui_update(&mut view, started);
    assert!(view.simulating);

    let completed = next_update(&mut harness.ui_rx).await;
    apply_ui_update(&mut view, completed);

    let report = view.scheduled_run.as_ref().expect("report should be set");
    assert_eq!(report.processed_users, 3);

    // The rendered panel shows the placeholder, not an empty list.
    let text: String = report_lines(report)
        .iter()
        .flat_map(|l| l.spans.iter().map(|s| s.content.as_ref().to_string()))
        .collect();
    assert!(text.contains("No messages sent in this run."));

    harness.cmd_tx.send(UserCommand::Quit).await.unwrap();
    let _ = harness.handle.await;
}

#[tokio::test]
async fn scheduled_run_failure_clears_report_and_sets_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/mockup-scheduled-run")
        .with_status(503)
        .create_async()
        .await;

    let mut harness = spawn_app(&server.url());
    let mut view = ViewState::default();
    view.scheduled_run = Some(ScheduledRunReport {
        processed_users: 9,
        messages: vec![],
    });

    harness
        .cmd_tx
        .send(UserCommand::SimulateScheduledRun)
        .await
        .unwrap();

    apply_ui_update(&mut view, next_update(&mut harness.ui_rx).await);
    assert!(view.scheduled_run.is_none(), "prior report cleared at start");

    let failed = next_update(&mut harness.ui_rx).await;
    assert!(matches!(failed, UiUpdate::ScheduledRunFailed(_)), "got {failed:?}");
    apply_ui_update(&mut view, failed);

    assert!(view.scheduled_run.is_none(), "report stays cleared on failure");
    assert!(view.error.as_deref().unwrap_or("").contains("503"));

    harness.cmd_tx.send(UserCommand::Quit).await.unwrap();
    let _ = harness.handle.await;
}

#[tokio::test]
async fn sequential_sends_append_in_completion_order() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/mockup-webhook")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"advice": "'advice': 'ok'"}"#)
        .expect(2)
        .create_async()
        .await;

    let mut harness = spawn_app(&server.url());
    let mut view = ViewState::default();

    for message in ["first", "second"] {
        harness
            .cmd_tx
            .send(UserCommand::SendMessage {
                phone: "555".into(),
                message: message.into(),
            })
            .await
            .unwrap();

        apply_ui_update(&mut view, next_update(&mut harness.ui_rx).await);
        apply_ui_update(&mut view, next_update(&mut harness.ui_rx).await);
    }

    let messages: Vec<_> = view.conversation.iter().map(|e| e.message.as_str()).collect();
    assert_eq!(messages, vec!["first", "second"]);

    harness.cmd_tx.send(UserCommand::Quit).await.unwrap();
    let _ = harness.handle.await;
}

// ===========================================================================
// Advice extraction over realistic payloads
// ===========================================================================

#[test]
fn advice_extraction_spec_properties() {
    // Quoted value with escaped newlines
    assert_eq!(
        extract_advice(r#""advice": "line1\nline2""#),
        "line1\nline2"
    );
    // No advice key: input returned unchanged
    assert_eq!(extract_advice("hello world"), "hello world");
    // Empty advice: empty string, not the fallback
    assert_eq!(extract_advice("'advice': ''"), "");
    // Single-quoted value inside a larger fragment
    assert_eq!(
        extract_advice("{'status': 'ok', 'advice': 'sow maize now', 'lang': 'en'}"),
        "sow maize now"
    );
}
