//! HTTP command transport.
//!
//! Commands are invoked as `POST {base_url}/invoke/{command}` with the JSON
//! arguments as the request body. The backend answers with the command's JSON
//! result, or a non-success status whose body carries the error message.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, instrument};

use portal_core::{defaults, CommandTransport, Error, Result, ShapeViolation};

use crate::config::BackendConfig;

/// Transport speaking to the local backend over HTTP.
pub struct HttpTransport {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl HttpTransport {
    /// Create a transport for `base_url` with a per-call timeout.
    pub fn new(base_url: impl Into<String>, timeout_secs: u64) -> Result<Self> {
        let timeout = Duration::from_secs(timeout_secs);
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Config(format!("failed to create HTTP client: {}", e)))?;

        let base_url = base_url.into().trim_end_matches('/').to_string();
        debug!(base_url = %base_url, timeout_secs, "HTTP transport created");

        Ok(Self {
            client,
            base_url,
            timeout,
        })
    }

    pub fn from_config(config: &BackendConfig) -> Result<Self> {
        Self::new(config.base_url.clone(), config.timeout_secs)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, command: &str) -> String {
        format!("{}/{}/{}", self.base_url, defaults::INVOKE_PATH, command)
    }
}

#[async_trait]
impl CommandTransport for HttpTransport {
    #[instrument(skip(self, payload), fields(subsystem = "gateway", component = "http", command = %command))]
    async fn invoke(&self, command: &str, payload: Option<&Value>) -> Result<Value> {
        let body = payload.cloned().unwrap_or_else(|| Value::Object(Default::default()));

        let response = self
            .client
            .post(self.endpoint(command))
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await
            .map_err(|e| classify(command, e))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(Error::Unavailable(format!(
                "backend does not provide command {}",
                command
            )));
        }
        if status == StatusCode::SERVICE_UNAVAILABLE {
            return Err(Error::Unavailable(format!(
                "backend returned {} for {}",
                status, command
            )));
        }
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(Error::rejected(command, rejection_message(status, &text)));
        }

        let bytes = response.bytes().await.map_err(|e| classify(command, e))?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }

        serde_json::from_slice(&bytes).map_err(|e| Error::Shape(ShapeViolation::NotJson(e.to_string())))
    }

    fn name(&self) -> &str {
        "http"
    }
}

/// Map a reqwest failure onto the absent/broken distinction.
fn classify(command: &str, err: reqwest::Error) -> Error {
    if err.is_timeout() {
        Error::Timeout {
            command: command.to_string(),
        }
    } else if err.is_connect() || err.is_request() {
        Error::Unavailable(format!("{}: {}", command, err))
    } else {
        Error::rejected(command, err.to_string())
    }
}

/// Backends usually answer errors with a JSON string; fall back to raw text.
fn rejection_message(status: StatusCode, body: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        return status.to_string();
    }
    match serde_json::from_str::<Value>(body) {
        Ok(Value::String(message)) => message,
        Ok(Value::Object(map)) => map
            .get("error")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| body.to_string()),
        _ => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let transport = HttpTransport::new("http://127.0.0.1:1430/", 5).unwrap();
        assert_eq!(transport.base_url(), "http://127.0.0.1:1430");
        assert_eq!(
            transport.endpoint("list_switches"),
            "http://127.0.0.1:1430/invoke/list_switches"
        );
    }

    #[test]
    fn test_rejection_message_json_string() {
        let message = rejection_message(StatusCode::INTERNAL_SERVER_ERROR, "\"database is locked\"");
        assert_eq!(message, "database is locked");
    }

    #[test]
    fn test_rejection_message_error_object() {
        let message =
            rejection_message(StatusCode::BAD_REQUEST, r#"{"error": "missing field title"}"#);
        assert_eq!(message, "missing field title");
    }

    #[test]
    fn test_rejection_message_plain_text_and_empty() {
        assert_eq!(
            rejection_message(StatusCode::INTERNAL_SERVER_ERROR, "boom"),
            "boom"
        );
        assert_eq!(
            rejection_message(StatusCode::INTERNAL_SERVER_ERROR, "  "),
            "500 Internal Server Error"
        );
    }

    #[test]
    fn test_name() {
        let transport = HttpTransport::new("http://127.0.0.1:1430", 5).unwrap();
        assert_eq!(transport.name(), "http");
    }
}
