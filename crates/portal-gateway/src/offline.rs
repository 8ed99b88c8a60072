//! Transport for running without any backend.

use async_trait::async_trait;
use serde_json::Value;
use tracing::trace;

use portal_core::{CommandTransport, Error, Result};

/// Rejects every command as unavailable, so reads come from the seed
/// catalog and writes fail visibly.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineTransport;

#[async_trait]
impl CommandTransport for OfflineTransport {
    async fn invoke(&self, command: &str, _payload: Option<&Value>) -> Result<Value> {
        trace!(command, "Offline transport refused command");
        Err(Error::Unavailable(format!(
            "offline mode, {} was not sent",
            command
        )))
    }

    fn name(&self) -> &str {
        "offline"
    }
}
