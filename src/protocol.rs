// Message and data types exchanged between the TUI, the app orchestrator,
// and spawned request tasks.

use chrono::{DateTime, Local};
use serde::Deserialize;
use serde_json::Value;

// ---------------------------------------------------------------------------
// Data model
// ---------------------------------------------------------------------------

/// One completed webhook exchange: what the operator sent and what the
/// backend replied. Appended to the conversation log, never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversationEntry {
    /// Phone number the simulated message was sent from.
    pub phone: String,
    /// The message text as submitted.
    pub message: String,
    /// The backend's response body, forwarded opaquely. Whether it carries
    /// an `advice` field is the advice extractor's problem, not ours.
    pub response: Value,
    /// When the response arrived (completion order, not submission order).
    pub received_at: DateTime<Local>,
}

/// A single outbound message reported by a scheduled batch run.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OutboundMessage {
    pub to: String,
    pub message: String,
}

/// Result of a simulated scheduled run. Replaced wholesale on each
/// simulation; never accumulated across runs.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScheduledRunReport {
    pub processed_users: u64,
    #[serde(default)]
    pub messages: Vec<OutboundMessage>,
}

// ---------------------------------------------------------------------------
// Channel messages
// ---------------------------------------------------------------------------

/// Commands sent from the TUI input handler to the app orchestrator.
#[derive(Debug, Clone, PartialEq)]
pub enum UserCommand {
    /// Submit a message to the webhook. Both fields are non-empty; the
    /// input layer enforces that before emitting the command.
    SendMessage { phone: String, message: String },
    /// Trigger the scheduled-run simulation.
    SimulateScheduledRun,
    /// Shut down the application.
    Quit,
}

/// Outcomes reported by spawned request tasks back to the orchestrator.
///
/// Errors arrive pre-rendered as display strings; the orchestrator does
/// not classify them further (a single user-visible string per failure).
#[derive(Debug)]
pub enum ApiEvent {
    WebhookCompleted {
        phone: String,
        message: String,
        result: Result<Value, String>,
    },
    ScheduledRunCompleted {
        result: Result<ScheduledRunReport, String>,
    },
}

/// State updates pushed from the orchestrator to the TUI render loop.
#[derive(Debug, Clone, PartialEq)]
pub enum UiUpdate {
    /// A webhook submission is in flight.
    SendStarted,
    /// A webhook exchange completed; append to the conversation log and
    /// clear the message input (the phone input is retained).
    ConversationAppended(Box<ConversationEntry>),
    /// A webhook submission failed; the conversation log is unchanged.
    SendFailed(String),
    /// A scheduled-run simulation is in flight; any prior report is cleared.
    ScheduledRunStarted,
    /// The scheduled-run simulation completed with a report.
    ScheduledRunReport(Box<ScheduledRunReport>),
    /// The scheduled-run simulation failed; the prior report stays cleared.
    ScheduledRunFailed(String),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
