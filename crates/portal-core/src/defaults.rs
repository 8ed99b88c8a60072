//! Centralized default constants for portal-it.
//!
//! **This module is the single source of truth** for shared default values.
//! Gateway, configuration and CLI code reference these constants instead of
//! defining their own magic numbers.

// =============================================================================
// BACKEND
// =============================================================================

/// Default base URL of the local backend command endpoint.
pub const BACKEND_URL: &str = "http://127.0.0.1:1430";

/// Path segment under the base URL where commands are invoked.
pub const INVOKE_PATH: &str = "invoke";

/// Default per-call timeout enforced by the HTTP transport (seconds).
pub const TIMEOUT_SECS: u64 = 10;

/// Upper bound accepted for a configured timeout (seconds).
pub const MAX_TIMEOUT_SECS: u64 = 300;

/// Calls slower than this are logged with `slow = true`.
pub const SLOW_CALL_MS: u64 = 2000;

// =============================================================================
// CONFIGURATION
// =============================================================================

/// Directory under the platform config dir holding portal-it settings.
pub const CONFIG_DIR_NAME: &str = "portal-it";

/// Configuration file name.
pub const CONFIG_FILE_NAME: &str = "portal.toml";

// =============================================================================
// COMMANDS
// =============================================================================

pub const CMD_GET_BOOKMARK_SECTIONS: &str = "get_bookmark_sections";
pub const CMD_LIST_SWITCHES: &str = "list_switches";
pub const CMD_LIST_TASKS: &str = "list_tasks";
pub const CMD_CREATE_TASK: &str = "create_task";
pub const CMD_TOGGLE_TASK: &str = "toggle_task";
pub const CMD_DELETE_TASK: &str = "delete_task";
pub const CMD_CREATE_BOOKMARK: &str = "create_bookmark";
pub const CMD_DELETE_BOOKMARK: &str = "delete_bookmark";
pub const CMD_SAVE_SWITCH: &str = "save_switch";
pub const CMD_DELETE_SWITCH: &str = "delete_switch";
pub const CMD_EXPORT_DATABASE: &str = "export_database";
pub const CMD_IMPORT_DATABASE: &str = "import_database";
