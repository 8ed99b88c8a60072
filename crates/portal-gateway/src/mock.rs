//! Scripted transport for deterministic testing.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use portal_gateway::mock::{MockFailure, MockTransport};
//! use serde_json::json;
//!
//! let transport = MockTransport::new()
//!     .with_response("list_switches", json!([]))
//!     .with_failure("list_tasks", MockFailure::Unavailable);
//!
//! // ... drive a gateway ...
//! assert_eq!(transport.call_count("list_switches"), 1);
//! ```

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use portal_core::{CommandTransport, Error, Result};

/// Failure modes a scripted command can produce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockFailure {
    Unavailable,
    Timeout,
    Rejected(String),
}

#[derive(Debug, Clone)]
enum Scripted {
    Respond(Value),
    Fail(MockFailure),
}

/// One recorded invocation.
#[derive(Debug, Clone)]
pub struct MockCall {
    pub command: String,
    pub payload: Option<Value>,
    pub timestamp: std::time::Instant,
}

/// Transport returning scripted answers per command name.
///
/// Clones share the script and the call log, so a test can keep a handle
/// after moving a clone into the gateway. Unscripted commands are reported
/// as unavailable.
#[derive(Clone, Default)]
pub struct MockTransport {
    script: Arc<Mutex<HashMap<String, Scripted>>>,
    call_log: Arc<Mutex<Vec<MockCall>>>,
    latency: Duration,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `command` with `value`.
    pub fn with_response(self, command: &str, value: Value) -> Self {
        self.set_response(command, value);
        self
    }

    /// Make `command` fail.
    pub fn with_failure(self, command: &str, failure: MockFailure) -> Self {
        self.set_failure(command, failure);
        self
    }

    /// Set simulated latency for all commands.
    pub fn with_latency_ms(mut self, latency_ms: u64) -> Self {
        self.latency = Duration::from_millis(latency_ms);
        self
    }

    /// Re-script `command` after construction.
    pub fn set_response(&self, command: &str, value: Value) {
        self.script
            .lock()
            .unwrap()
            .insert(command.to_string(), Scripted::Respond(value));
    }

    pub fn set_failure(&self, command: &str, failure: MockFailure) {
        self.script
            .lock()
            .unwrap()
            .insert(command.to_string(), Scripted::Fail(failure));
    }

    /// Get all logged calls for assertion.
    pub fn calls(&self) -> Vec<MockCall> {
        self.call_log.lock().unwrap().clone()
    }

    /// Number of invocations of `command`.
    pub fn call_count(&self, command: &str) -> usize {
        self.call_log
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.command == command)
            .count()
    }

    /// Payload of the most recent invocation of `command`.
    pub fn last_payload(&self, command: &str) -> Option<Value> {
        self.call_log
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|c| c.command == command)
            .and_then(|c| c.payload.clone())
    }

    /// Clear the call log.
    pub fn clear_calls(&self) {
        self.call_log.lock().unwrap().clear()
    }

    fn log_call(&self, command: &str, payload: Option<&Value>) {
        self.call_log.lock().unwrap().push(MockCall {
            command: command.to_string(),
            payload: payload.cloned(),
            timestamp: std::time::Instant::now(),
        });
    }
}

#[async_trait]
impl CommandTransport for MockTransport {
    async fn invoke(&self, command: &str, payload: Option<&Value>) -> Result<Value> {
        self.log_call(command, payload);
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let scripted = self.script.lock().unwrap().get(command).cloned();
        match scripted {
            Some(Scripted::Respond(value)) => Ok(value),
            Some(Scripted::Fail(MockFailure::Unavailable)) | None => Err(Error::Unavailable(
                format!("mock has no backend for {}", command),
            )),
            Some(Scripted::Fail(MockFailure::Timeout)) => Err(Error::Timeout {
                command: command.to_string(),
            }),
            Some(Scripted::Fail(MockFailure::Rejected(message))) => {
                Err(Error::rejected(command, message))
            }
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}
