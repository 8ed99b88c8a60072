//! # portal-core
//!
//! Core types, contracts, and pure logic for the portal-it operations portal.
//!
//! This crate provides the foundational data structures that the gateway
//! and CLI crates depend on:
//! - Record types for bookmarks, switches, and tasks
//! - Response shape contracts used to decide whether backend data is trusted
//! - The seed catalog substituted when the backend cannot be used
//! - The free-text filter engine applied to every listing
//! - The `CommandTransport` capability implemented by concrete transports

pub mod defaults;
pub mod error;
pub mod filter;
pub mod logging;
pub mod models;
pub mod outcome;
pub mod seed;
pub mod shape;
pub mod traits;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use filter::{
    filter_by, filter_records, filter_sections, matches, normalize_term, Searchable, SectionView,
};
pub use models::*;
pub use outcome::{FallbackKind, FallbackReason, Fetched, Origin};
pub use seed::{seed_bookmark_sections, seed_collection, seed_switches, seed_tasks, SEED_VERSION};
pub use shape::{Ack, RecordId, Shape, ShapeViolation};
pub use traits::CommandTransport;
