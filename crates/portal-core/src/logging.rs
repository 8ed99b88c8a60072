//! Structured logging schema and field name constants for portal-it.
//!
//! All crates use these constants for consistent structured logging fields,
//! so a degraded session can be reconstructed from logs alone: which command
//! failed, why, and whether the user was shown seed data.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Startup cannot continue (reported by the binary) |
//! | WARN  | Seed fallback applied, write failed, slow backend call |
//! | INFO  | Lifecycle events (startup, shutdown), completed writes |
//! | DEBUG | Cache hits/misses, live fetch completions, config choices |
//! | TRACE | Per-record filter decisions |

// ─── Identity fields ───────────────────────────────────────────────────────

/// Subsystem originating the log event.
/// Values: "gateway", "cache", "mutation", "portal", "cli"
pub const SUBSYSTEM: &str = "subsystem";

/// Component within a subsystem.
/// Examples: "http", "offline", "query_cache"
pub const COMPONENT: &str = "component";

/// Logical operation name.
/// Examples: "read", "write", "get", "invalidate", "create"
pub const OPERATION: &str = "op";

// ─── Entity fields ─────────────────────────────────────────────────────────

/// Backend command name (e.g. "list_switches").
pub const COMMAND: &str = "command";

/// Collection key being read or written ("bookmarks", "switches", "tasks").
pub const COLLECTION: &str = "collection";

/// Record id targeted by a write.
pub const RECORD_ID: &str = "record_id";

/// Free-text filter term after normalisation.
pub const TERM: &str = "term";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Number of records returned by a read or surviving a filter.
pub const RESULT_COUNT: &str = "result_count";

// ─── Outcome fields ────────────────────────────────────────────────────────

/// Data origin of a read ("live", "fallback").
pub const ORIGIN: &str = "origin";

/// Why a read fell back ("unavailable", "rejected", "malformed").
pub const FALLBACK_KIND: &str = "fallback_kind";

/// Boolean success/failure indicator.
pub const SUCCESS: &str = "success";

/// Error message when an operation fails.
pub const ERROR_MSG: &str = "error";

/// Slow operation threshold exceeded.
pub const SLOW: &str = "slow";
