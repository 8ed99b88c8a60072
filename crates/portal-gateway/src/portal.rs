//! Composition root.
//!
//! A [`Portal`] owns one gateway, one query cache and one mutation pipeline
//! for its lifetime. It is built explicitly at startup and torn down with
//! [`Portal::shutdown`].

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, instrument};

use portal_core::{
    filter_records, filter_sections, BookmarkSection, CollectionKey, CommandTransport,
    FallbackReason, Origin, Result, Switch, Task,
};

use crate::cache::{CacheEntry, QueryCache};
use crate::config::{BackendMode, PortalConfig};
use crate::gateway::CommandGateway;
use crate::http::HttpTransport;
use crate::mutation::MutationPipeline;
use crate::offline::OfflineTransport;

/// Filtered view of one collection with its provenance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Listing<T> {
    pub items: Vec<T>,
    pub origin: Origin,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<FallbackReason>,
    pub fetched_at: DateTime<Utc>,
    /// Record count before filtering.
    pub total: usize,
}

impl<T> Listing<T> {
    fn from_entry(entry: &CacheEntry, items: Vec<T>, total: usize) -> Self {
        Self {
            items,
            origin: entry.origin,
            reason: entry.reason.clone(),
            fetched_at: entry.fetched_at,
            total,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.origin == Origin::Fallback
    }
}

/// Origin of each collection after a warm-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WarmReport {
    pub bookmarks: Origin,
    pub switches: Origin,
    pub tasks: Origin,
}

impl WarmReport {
    pub fn all_live(&self) -> bool {
        [self.bookmarks, self.switches, self.tasks]
            .iter()
            .all(|origin| *origin == Origin::Live)
    }
}

/// The operations portal: reads with fallback and filtering, plus writes.
pub struct Portal {
    gateway: CommandGateway,
    cache: QueryCache,
    mutations: MutationPipeline,
}

impl Portal {
    /// Build a portal around an existing transport.
    pub fn new(transport: Arc<dyn CommandTransport>) -> Self {
        let gateway = CommandGateway::new(transport);
        let cache = QueryCache::new(gateway.clone());
        let mutations = MutationPipeline::new(gateway.clone(), cache.clone());
        Self {
            gateway,
            cache,
            mutations,
        }
    }

    /// Validate `config` and build the transport it selects.
    pub fn start(config: &PortalConfig) -> Result<Self> {
        config.validate()?;

        let transport: Arc<dyn CommandTransport> = match config.backend.mode {
            BackendMode::Http => Arc::new(HttpTransport::from_config(&config.backend)?),
            BackendMode::Offline => Arc::new(OfflineTransport),
        };

        info!(
            subsystem = "portal",
            mode = %config.backend.mode,
            transport = transport.name(),
            "Portal started"
        );
        Ok(Self::new(transport))
    }

    pub fn transport_name(&self) -> &str {
        self.gateway.transport_name()
    }

    pub fn gateway(&self) -> &CommandGateway {
        &self.gateway
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    pub fn mutations(&self) -> &MutationPipeline {
        &self.mutations
    }

    /// Fetch all three collections concurrently.
    #[instrument(skip(self), fields(subsystem = "portal", op = "warm"))]
    pub async fn warm(&self) -> WarmReport {
        let (bookmarks, switches, tasks) = futures::join!(
            self.cache.get(CollectionKey::Bookmarks),
            self.cache.get(CollectionKey::Switches),
            self.cache.get(CollectionKey::Tasks),
        );
        let report = WarmReport {
            bookmarks: bookmarks.origin,
            switches: switches.origin,
            tasks: tasks.origin,
        };
        info!(all_live = report.all_live(), "Collections warmed");
        report
    }

    /// Bookmark sections matching `term`, with empty sections pruned.
    pub async fn bookmarks(&self, term: &str) -> Listing<BookmarkSection> {
        let entry = self.cache.get(CollectionKey::Bookmarks).await;
        let sections = entry.collection.bookmark_sections().unwrap_or(&[]);
        let total = sections.iter().map(|s| s.links.len()).sum();
        let items = filter_sections(sections, term)
            .iter()
            .map(|view| view.to_section())
            .collect();
        Listing::from_entry(&entry, items, total)
    }

    pub async fn switches(&self, term: &str) -> Listing<Switch> {
        let entry = self.cache.get(CollectionKey::Switches).await;
        let switches = entry.collection.switches().unwrap_or(&[]);
        let items = filter_records(switches, term).into_iter().cloned().collect();
        Listing::from_entry(&entry, items, switches.len())
    }

    pub async fn tasks(&self, term: &str) -> Listing<Task> {
        let entry = self.cache.get(CollectionKey::Tasks).await;
        let tasks = entry.collection.tasks().unwrap_or(&[]);
        let items = filter_records(tasks, term).into_iter().cloned().collect();
        Listing::from_entry(&entry, items, tasks.len())
    }

    /// Tear down: drop every cached entry.
    pub async fn shutdown(self) {
        let stats = self.cache.stats().await;
        self.cache.clear().await;
        info!(
            subsystem = "portal",
            hits = stats.hits,
            misses = stats.misses,
            invalidations = stats.invalidations,
            "Portal shut down"
        );
    }
}
