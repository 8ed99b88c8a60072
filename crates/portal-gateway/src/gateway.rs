//! Command gateway.
//!
//! One generic entry point invokes any backend command and decodes the answer
//! through the response type's [`Shape`] contract. Reads wrap it with seed
//! substitution and never fail; writes use it directly and see every error.

use serde_json::Value;
use std::sync::Arc;
use tokio::time::Instant;
use tracing::{debug, instrument, warn};

use portal_core::{
    defaults, seed_bookmark_sections, seed_switches, seed_tasks, Collection, CollectionKey,
    CommandTransport, FallbackReason, Fetched, Result, Shape,
};

/// Issues backend commands through a pluggable transport.
#[derive(Clone)]
pub struct CommandGateway {
    transport: Arc<dyn CommandTransport>,
}

impl CommandGateway {
    pub fn new(transport: Arc<dyn CommandTransport>) -> Self {
        Self { transport }
    }

    /// Name of the underlying transport.
    pub fn transport_name(&self) -> &str {
        self.transport.name()
    }

    /// Invoke `command` and decode the answer as `T`.
    ///
    /// Transport failures, backend rejections and contract violations are all
    /// returned to the caller. Every call is a fresh remote attempt.
    #[instrument(skip(self, payload), fields(subsystem = "gateway", op = "call", command = %command, transport = %self.transport.name()))]
    pub async fn call<T: Shape>(&self, command: &str, payload: Option<Value>) -> Result<T> {
        let start = Instant::now();
        let outcome = self.transport.invoke(command, payload.as_ref()).await;
        let elapsed = start.elapsed().as_millis() as u64;

        // Slow failures (transport timeouts) are reported too.
        if elapsed > defaults::SLOW_CALL_MS {
            warn!(
                command,
                duration_ms = elapsed,
                slow = true,
                success = outcome.is_ok(),
                "Slow backend call"
            );
        }

        let decoded = T::from_response(outcome?)?;
        debug!(command, duration_ms = elapsed, expected = T::EXPECTED, "Backend call complete");
        Ok(decoded)
    }

    /// Invoke a read command, substituting `seed()` on any failure.
    ///
    /// The substitution is all-or-nothing: a single malformed element discards
    /// the whole live response.
    pub async fn read<T, F>(&self, command: &str, payload: Option<Value>, seed: F) -> Fetched<T>
    where
        T: Shape,
        F: FnOnce() -> T,
    {
        match self.call::<T>(command, payload).await {
            Ok(data) => Fetched::Live(data),
            Err(err) => {
                let reason = FallbackReason::from(&err);
                let collection = CollectionKey::from_list_command(command)
                    .map(|key| key.as_str())
                    .unwrap_or("none");
                warn!(
                    command,
                    collection,
                    fallback_kind = %reason.kind,
                    backend_absent = err.is_backend_absent(),
                    error = %err,
                    "Backend read failed, serving seed data"
                );
                Fetched::Fallback {
                    data: seed(),
                    reason,
                }
            }
        }
    }

    /// Read one collection, falling back to its seed dataset.
    #[instrument(skip(self), fields(subsystem = "gateway", op = "fetch", collection = %key))]
    pub async fn fetch(&self, key: CollectionKey) -> Fetched<Collection> {
        let command = key.list_command();
        let fetched = match key {
            CollectionKey::Bookmarks => self
                .read(command, None, seed_bookmark_sections)
                .await
                .map(Collection::Bookmarks),
            CollectionKey::Switches => self
                .read(command, None, seed_switches)
                .await
                .map(Collection::Switches),
            CollectionKey::Tasks => self
                .read(command, None, seed_tasks)
                .await
                .map(Collection::Tasks),
        };

        debug!(
            origin = %fetched.origin(),
            result_count = fetched.data().record_count(),
            "Collection fetched"
        );
        fetched
    }
}
