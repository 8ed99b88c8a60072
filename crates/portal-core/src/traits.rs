//! Core traits for portal-it abstractions.
//!
//! These traits define the interfaces that concrete implementations
//! must satisfy, enabling pluggable backends and testability.

use async_trait::async_trait;
use serde_json::Value as JsonValue;

use crate::error::Result;

// =============================================================================
// BACKEND TRANSPORT
// =============================================================================

/// Capability to invoke a named backend command.
///
/// Implementations only move bytes: they report transport failures and
/// backend rejections as errors and hand back the raw JSON answer. Whether
/// that answer is trustworthy is decided by the caller's shape contract.
#[async_trait]
pub trait CommandTransport: Send + Sync {
    /// Invoke `command` with an optional JSON object of arguments.
    async fn invoke(&self, command: &str, payload: Option<&JsonValue>) -> Result<JsonValue>;

    /// Short transport name for logs ("http", "offline", "mock").
    fn name(&self) -> &str;
}
