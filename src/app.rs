// Application state and orchestration logic.
//
// The central event loop that coordinates user commands from the TUI and
// completion events from spawned request tasks. Maintains the session
// state (conversation log, scheduled-run report, error banner) and pushes
// UI updates to the TUI render loop.

use std::sync::Arc;

use chrono::Local;
use serde_json::Value;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::api::ApiClient;
use crate::config::Config;
use crate::protocol::{ApiEvent, ConversationEntry, ScheduledRunReport, UiUpdate, UserCommand};

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

/// The complete session state. Local to this process; a restart resets it.
pub struct AppState {
    pub config: Config,
    /// HTTP client for the fixed backend deployment, shared with spawned
    /// request tasks.
    pub api: Arc<ApiClient>,
    /// Append-only conversation log, ordered by request completion.
    pub conversation: Vec<ConversationEntry>,
    /// Latest scheduled-run report. Replaced wholesale per simulation.
    pub scheduled_run: Option<ScheduledRunReport>,
    /// Current user-visible error, cleared at the start of every request.
    pub error: Option<String>,
    /// A webhook submission is in flight. Overlapping sends are not
    /// prevented; the latest completion clears the flag.
    pub sending: bool,
    /// A scheduled-run simulation is in flight. Unlike sends, a new
    /// simulation is refused while one is pending.
    pub simulating: bool,
    /// Sender for request-task outcomes; spawned tasks use a clone to
    /// report back to the main event loop.
    pub api_tx: mpsc::Sender<ApiEvent>,
}

impl AppState {
    pub fn new(config: Config, api: ApiClient, api_tx: mpsc::Sender<ApiEvent>) -> Self {
        AppState {
            config,
            api: Arc::new(api),
            conversation: Vec::new(),
            scheduled_run: None,
            error: None,
            sending: false,
            simulating: false,
            api_tx,
        }
    }

    /// Apply a completed webhook exchange and return the UI update to push.
    ///
    /// On success the exchange is appended to the conversation log; on
    /// failure the log is left unchanged and the error banner is set.
    pub fn apply_webhook_result(
        &mut self,
        phone: String,
        message: String,
        result: Result<Value, String>,
    ) -> UiUpdate {
        self.sending = false;
        match result {
            Ok(response) => {
                let entry = ConversationEntry {
                    phone,
                    message,
                    response,
                    received_at: Local::now(),
                };
                self.conversation.push(entry.clone());
                info!(entries = self.conversation.len(), "webhook exchange appended");
                UiUpdate::ConversationAppended(Box::new(entry))
            }
            Err(msg) => {
                warn!(%msg, "webhook submission failed");
                self.error = Some(msg.clone());
                UiUpdate::SendFailed(msg)
            }
        }
    }

    /// Apply a completed scheduled-run simulation and return the UI update.
    ///
    /// On failure the previously cleared report stays cleared; it is not
    /// restored.
    pub fn apply_scheduled_run_result(
        &mut self,
        result: Result<ScheduledRunReport, String>,
    ) -> UiUpdate {
        self.simulating = false;
        match result {
            Ok(report) => {
                info!(
                    processed_users = report.processed_users,
                    messages = report.messages.len(),
                    "scheduled run completed"
                );
                self.scheduled_run = Some(report.clone());
                UiUpdate::ScheduledRunReport(Box::new(report))
            }
            Err(msg) => {
                warn!(%msg, "scheduled-run simulation failed");
                self.error = Some(msg.clone());
                UiUpdate::ScheduledRunFailed(msg)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Command handling
// ---------------------------------------------------------------------------

/// Handle a user command. Returns the UI update to push immediately, or
/// `None` when the command was refused (scheduled run already in flight).
///
/// Request work happens in spawned tasks; their outcomes arrive later as
/// `ApiEvent`s on the orchestrator's api channel.
fn handle_command(state: &mut AppState, command: UserCommand) -> Option<UiUpdate> {
    match command {
        UserCommand::SendMessage { phone, message } => {
            state.error = None;
            state.sending = true;
            info!(%phone, "submitting message to webhook");

            let api = Arc::clone(&state.api);
            let api_tx = state.api_tx.clone();
            tokio::spawn(async move {
                let result = api
                    .send_message(&phone, &message)
                    .await
                    .map_err(|e| e.display_message());
                let _ = api_tx
                    .send(ApiEvent::WebhookCompleted {
                        phone,
                        message,
                        result,
                    })
                    .await;
            });

            Some(UiUpdate::SendStarted)
        }
        UserCommand::SimulateScheduledRun => {
            if state.simulating {
                // A simulation is already pending; mirror the disabled button.
                return None;
            }
            state.error = None;
            state.scheduled_run = None;
            state.simulating = true;
            info!("triggering scheduled-run simulation");

            let api = Arc::clone(&state.api);
            let api_tx = state.api_tx.clone();
            tokio::spawn(async move {
                let result = api.scheduled_run().await.map_err(|e| e.display_message());
                let _ = api_tx.send(ApiEvent::ScheduledRunCompleted { result }).await;
            });

            Some(UiUpdate::ScheduledRunStarted)
        }
        // Quit is handled by the run loop before reaching here.
        UserCommand::Quit => None,
    }
}

fn handle_api_event(state: &mut AppState, event: ApiEvent) -> UiUpdate {
    match event {
        ApiEvent::WebhookCompleted {
            phone,
            message,
            result,
        } => state.apply_webhook_result(phone, message, result),
        ApiEvent::ScheduledRunCompleted { result } => state.apply_scheduled_run_result(result),
    }
}

// ---------------------------------------------------------------------------
// Main orchestrator loop
// ---------------------------------------------------------------------------

/// Run the orchestrator until `Quit` arrives or the command channel closes.
///
/// Request outcomes are applied in the order their tasks complete, not the
/// order they were issued; overlapping sends may interleave.
pub async fn run(
    mut cmd_rx: mpsc::Receiver<UserCommand>,
    mut api_rx: mpsc::Receiver<ApiEvent>,
    ui_tx: mpsc::Sender<UiUpdate>,
    mut state: AppState,
) -> anyhow::Result<()> {
    loop {
        tokio::select! {
            command = cmd_rx.recv() => {
                match command {
                    Some(UserCommand::Quit) | None => {
                        info!("orchestrator shutting down");
                        break;
                    }
                    Some(command) => {
                        if let Some(update) = handle_command(&mut state, command) {
                            if ui_tx.send(update).await.is_err() {
                                break;
                            }
                        }
                    }
                }
            }
            event = api_rx.recv() => {
                match event {
                    Some(event) => {
                        let update = handle_api_event(&mut state, event);
                        if ui_tx.send(update).await.is_err() {
                            break;
                        }
                    }
                    None => break,
                }
            }
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
