// HTTP client for the mockup backend endpoints.
//
// Two calls: POST the simulated incoming message to the webhook, and GET
// the scheduled-run simulation. The webhook response body is forwarded
// opaquely as `serde_json::Value`; only the scheduled-run report has a
// shape we deserialize.

use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::protocol::ScheduledRunReport;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

const WEBHOOK_PATH: &str = "/mockup-webhook";
const SCHEDULED_RUN_PATH: &str = "/mockup-scheduled-run";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("server returned status {0}")]
    Status(StatusCode),

    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("failed to decode response body: {0}")]
    Decode(String),
}

impl ApiError {
    /// Render the error as a single user-visible string, falling back to a
    /// generic message when the underlying failure carries no text.
    pub fn display_message(&self) -> String {
        let text = self.to_string();
        if text.is_empty() {
            "Error contacting server".to_string()
        } else {
            text
        }
    }
}

// ---------------------------------------------------------------------------
// ApiClient
// ---------------------------------------------------------------------------

/// Client for the fixed backend deployment. The base URL is set once at
/// construction and never changes at runtime.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client for the given base URL. A trailing slash is
    /// stripped so path concatenation stays predictable.
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Submit a simulated incoming message to the webhook.
    ///
    /// Returns the response body as an opaque JSON value. The body is not
    /// validated here; the advice extractor deals with its looseness at
    /// render time.
    pub async fn send_message(&self, phone: &str, message: &str) -> Result<Value, ApiError> {
        let url = format!("{}{}", self.base_url, WEBHOOK_PATH);
        debug!(%url, %phone, "posting webhook message");

        let response = self
            .http
            .post(&url)
            .json(&serde_json::json!({ "phone": phone, "message": message }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status(status));
        }

        // Tolerate non-JSON bodies by wrapping them as a JSON string, so
        // the raw text still reaches the conversation log.
        let text = response.text().await?;
        match serde_json::from_str::<Value>(&text) {
            Ok(value) => Ok(value),
            Err(_) => Ok(Value::String(text)),
        }
    }

    /// Trigger the scheduled-run simulation and fetch its report.
    pub async fn scheduled_run(&self) -> Result<ScheduledRunReport, ApiError> {
        let url = format!("{}{}", self.base_url, SCHEDULED_RUN_PATH);
        debug!(%url, "requesting scheduled-run simulation");

        let response = self.http.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status(status));
        }

        response
            .json::<ScheduledRunReport>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
