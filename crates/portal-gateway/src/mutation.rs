//! Mutation pipeline.
//!
//! Writes go straight through the gateway with no seed substitution. A
//! successful write invalidates the affected collection in the query cache;
//! a failed write leaves the cache alone and returns the error.

use serde::Serialize;
use serde_json::{json, Value};
use std::fmt;
use tracing::{info, instrument, warn};

use portal_core::{defaults, Ack, CollectionKey, Draft, Error, RecordId, Result};

use crate::cache::QueryCache;
use crate::gateway::CommandGateway;

/// Write side of the portal.
#[derive(Clone)]
pub struct MutationPipeline {
    gateway: CommandGateway,
    cache: QueryCache,
}

impl MutationPipeline {
    pub fn new(gateway: CommandGateway, cache: QueryCache) -> Self {
        Self { gateway, cache }
    }

    /// Create a record in `key`.
    ///
    /// Returns the backend-assigned id for collections whose create command
    /// reports one (bookmarks, switches) and `None` for tasks. The draft is
    /// trimmed and validated before anything is sent.
    #[instrument(skip(self, draft), fields(subsystem = "mutation", op = "create", collection = %key))]
    pub async fn create(&self, key: CollectionKey, draft: Draft) -> Result<Option<i64>> {
        if draft.key() != key {
            return Err(Error::InvalidInput(format!(
                "{} draft cannot be created in {}",
                draft.key(),
                key
            )));
        }

        let outcome = match draft.normalized()? {
            Draft::Task(task) => self
                .gateway
                .call::<Ack>(defaults::CMD_CREATE_TASK, Some(json!({ "title": task.title })))
                .await
                .map(|_| None),
            Draft::Bookmark(bookmark) => {
                // The backend deserializes a full bookmark, so the id is required
                // even though it is ignored on insert.
                let mut payload = serde_json::to_value(&bookmark)?;
                if let Value::Object(map) = &mut payload {
                    map.insert("id".to_string(), json!(0));
                }
                self.gateway
                    .call::<RecordId>(defaults::CMD_CREATE_BOOKMARK, Some(json!({ "payload": payload })))
                    .await
                    .map(|RecordId(id)| Some(id))
            }
            Draft::Switch(switch) => {
                let payload = serde_json::to_value(&switch)?;
                self.gateway
                    .call::<RecordId>(defaults::CMD_SAVE_SWITCH, Some(json!({ "payload": payload })))
                    .await
                    .map(|RecordId(id)| Some(id))
            }
        };

        self.settle(key, outcome).await
    }

    /// Set a task's completion state.
    ///
    /// Only tasks carry a completion flag; other collections are refused
    /// without contacting the backend.
    #[instrument(skip(self), fields(subsystem = "mutation", op = "toggle", collection = %key, record_id = id))]
    pub async fn toggle(&self, key: CollectionKey, id: i64, completed: bool) -> Result<()> {
        if key != CollectionKey::Tasks {
            return Err(Error::Unsupported(format!("toggle is not available for {}", key)));
        }

        let outcome = self
            .gateway
            .call::<Ack>(
                defaults::CMD_TOGGLE_TASK,
                Some(json!({ "id": id, "completed": completed })),
            )
            .await
            .map(|_| ());

        self.settle(key, outcome).await
    }

    /// Delete record `id` from `key`.
    #[instrument(skip(self), fields(subsystem = "mutation", op = "delete", collection = %key, record_id = id))]
    pub async fn delete(&self, key: CollectionKey, id: i64) -> Result<()> {
        let command = match key {
            CollectionKey::Tasks => defaults::CMD_DELETE_TASK,
            CollectionKey::Bookmarks => defaults::CMD_DELETE_BOOKMARK,
            CollectionKey::Switches => defaults::CMD_DELETE_SWITCH,
        };

        let outcome = self
            .gateway
            .call::<Ack>(command, Some(json!({ "id": id })))
            .await
            .map(|_| ());

        self.settle(key, outcome).await
    }

    /// Ask the backend to write a database backup.
    ///
    /// Touches no collection, so nothing is invalidated.
    #[instrument(skip(self), fields(subsystem = "mutation", op = "export"))]
    pub async fn export(&self) -> Result<()> {
        match self.gateway.call::<Ack>(defaults::CMD_EXPORT_DATABASE, None).await {
            Ok(_) => {
                info!("Database export complete");
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "Database export failed");
                Err(err)
            }
        }
    }

    /// Ask the backend to restore a database backup. Every collection may
    /// have changed, so all keys are invalidated on success.
    #[instrument(skip(self), fields(subsystem = "mutation", op = "import"))]
    pub async fn import(&self) -> Result<()> {
        match self.gateway.call::<Ack>(defaults::CMD_IMPORT_DATABASE, None).await {
            Ok(_) => {
                self.cache.invalidate_all().await;
                info!("Database import complete, all collections invalidated");
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "Database import failed");
                Err(err)
            }
        }
    }

    async fn settle<T>(&self, key: CollectionKey, outcome: Result<T>) -> Result<T> {
        match outcome {
            Ok(value) => {
                self.cache.invalidate(key).await;
                info!(collection = %key, success = true, "Write applied");
                Ok(value)
            }
            Err(err) => {
                warn!(collection = %key, success = false, error = %err, "Write failed, cache untouched");
                Err(err)
            }
        }
    }
}

/// Severity of a user-facing notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Error,
}

/// Message to show after a write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    /// Build a notice from a write outcome.
    pub fn from_result<T>(result: &Result<T>, success: impl Into<String>) -> Self {
        match result {
            Ok(_) => Self {
                level: NoticeLevel::Success,
                message: success.into(),
            },
            Err(err) => Self {
                level: NoticeLevel::Error,
                message: err.to_string(),
            },
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.level {
            NoticeLevel::Success => write!(f, "{}", self.message),
            NoticeLevel::Error => write!(f, "error: {}", self.message),
        }
    }
}
