//! # portal-gateway
//!
//! Backend access for the portal-it operations portal.
//!
//! Reads go through a [`QueryCache`] in front of a [`CommandGateway`]; when
//! the backend is missing or answers with data that breaks its contract, the
//! seed catalog is served instead and tagged as fallback. Writes go through
//! the [`MutationPipeline`], which surfaces every failure and invalidates the
//! cache only on success.
//!
//! ## Transports
//!
//! - [`HttpTransport`]: `POST {base_url}/invoke/{command}` via reqwest
//! - [`OfflineTransport`]: no backend at all
//! - `MockTransport`: scripted answers for tests (feature `mock`)
//!
//! ## Example
//!
//! ```rust,ignore
//! use portal_gateway::{Portal, PortalConfig};
//!
//! let portal = Portal::start(&PortalConfig::load()?)?;
//! let switches = portal.switches("piso 2").await;
//! println!("{} ({})", switches.items.len(), switches.origin);
//! portal.shutdown().await;
//! ```

pub mod cache;
pub mod config;
pub mod gateway;
pub mod http;
pub mod mutation;
pub mod offline;
pub mod portal;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use cache::{CacheEntry, CacheStats, QueryCache};
pub use config::{BackendConfig, BackendMode, ConfigError, ConfigResult, PortalConfig};
pub use gateway::CommandGateway;
pub use http::HttpTransport;
pub use mutation::{MutationPipeline, Notice, NoticeLevel};
pub use offline::OfflineTransport;
pub use portal::{Listing, Portal, WarmReport};

// Re-export core types for convenience
pub use portal_core::{CollectionKey, Error, Origin, Result};
