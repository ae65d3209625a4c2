//! Dispatch client for the validation workflow engine.

use serde::{Deserialize, Serialize};

use crate::config::ValidatorConfig;

/// Sentinel sent in place of inline file content when the note was
/// uploaded to storage and the engine should fetch it by URL instead.
pub const FILE_UPLOAD_SENTINEL: &str = "FILE_UPLOAD_URL_PROVIDED";

/// Payload posted to the engine's webhook for one validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationRequest {
    pub validation_id: String,
    pub file_name: String,
    pub file_type: String,
    /// Inline note content, or [`FILE_UPLOAD_SENTINEL`] when `file_url`
    /// is set.
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_url: Option<String>,
    pub state: String,
    pub region: String,
    pub user_id: String,
}

/// Acknowledgement returned by the engine at dispatch time.
///
/// The engine's response shape is not contractual: some deployments
/// return JSON, some plain text, some an empty body. Missing fields
/// take fixed defaults so callers always see a complete acknowledgement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResponse {
    #[serde(default = "default_execution_id")]
    pub execution_id: String,
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(default = "default_message")]
    pub message: String,
}

fn default_execution_id() -> String {
    "unknown".to_string()
}

fn default_status() -> String {
    "processing".to_string()
}

fn default_message() -> String {
    "Request accepted".to_string()
}

impl Default for ValidationResponse {
    fn default() -> Self {
        Self {
            execution_id: default_execution_id(),
            status: default_status(),
            message: default_message(),
        }
    }
}

/// Errors from the dispatch layer.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// No usable endpoint URL is configured.
    #[error("validator webhook URL is not configured")]
    NotConfigured,

    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The engine returned a non-2xx status code.
    #[error("validator API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },
}

/// HTTP client for the validation engine's dispatch webhook.
pub struct ValidatorClient {
    client: reqwest::Client,
    config: ValidatorConfig,
}

impl ValidatorClient {
    pub fn new(config: ValidatorConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, config: ValidatorConfig) -> Self {
        Self { client, config }
    }

    /// Whether a usable endpoint is configured.
    pub fn is_configured(&self) -> bool {
        self.config.resolve().is_some()
    }

    /// Submit a validation request to the engine.
    ///
    /// Fails with [`DispatchError::NotConfigured`] before any network
    /// activity when the endpoint URL is unset or still the placeholder.
    pub async fn dispatch(
        &self,
        request: &ValidationRequest,
    ) -> Result<ValidationResponse, DispatchError> {
        let url = self.config.resolve().ok_or(DispatchError::NotConfigured)?;

        tracing::info!(
            validation_id = %request.validation_id,
            file_name = %request.file_name,
            "dispatching validation request"
        );

        let response = self.client.post(url).json(request).send().await?;
        let status = response.status();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.text().await?;

        if !status.is_success() {
            return Err(DispatchError::Api {
                status: status.as_u16(),
                body,
            });
        }

        Ok(parse_dispatch_response(content_type.as_deref(), &body))
    }
}

/// Decode the engine's acknowledgement body.
///
/// JSON bodies are decoded with per-field defaults; anything else (plain
/// text, empty) becomes a default acknowledgement carrying the body text
/// as its message when there is one.
pub fn parse_dispatch_response(content_type: Option<&str>, body: &str) -> ValidationResponse {
    let is_json = content_type
        .map(|ct| ct.contains("application/json"))
        .unwrap_or(false);

    if is_json {
        if let Ok(response) = serde_json::from_str::<ValidationResponse>(body) {
            return response;
        }
    }

    let mut response = ValidationResponse::default();
    if !body.trim().is_empty() {
        response.message = body.trim().to_string();
    }
    response
}
