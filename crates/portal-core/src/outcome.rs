//! Two-branch read outcome: live data, or seed data plus the reason.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::Error;

/// Where the data shown to the user came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    Live,
    Fallback,
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Live => write!(f, "live"),
            Self::Fallback => write!(f, "fallback"),
        }
    }
}

/// Coarse classification of a failed read.
///
/// `Unavailable` is routine in offline mode. `Rejected` and `Malformed` mean
/// the backend is running but misbehaving, which deserves attention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FallbackKind {
    Unavailable,
    Rejected,
    Malformed,
}

impl fmt::Display for FallbackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable => write!(f, "unavailable"),
            Self::Rejected => write!(f, "rejected"),
            Self::Malformed => write!(f, "malformed"),
        }
    }
}

/// Why a read was served from the seed catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FallbackReason {
    pub kind: FallbackKind,
    pub detail: String,
}

impl From<&Error> for FallbackReason {
    fn from(err: &Error) -> Self {
        let kind = match err {
            Error::Unavailable(_) | Error::Timeout { .. } => FallbackKind::Unavailable,
            Error::Shape(_) | Error::Serialization(_) => FallbackKind::Malformed,
            _ => FallbackKind::Rejected,
        };
        Self {
            kind,
            detail: err.to_string(),
        }
    }
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.detail)
    }
}

/// Result of a read that never fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fetched<T> {
    Live(T),
    Fallback { data: T, reason: FallbackReason },
}

impl<T> Fetched<T> {
    pub fn origin(&self) -> Origin {
        match self {
            Self::Live(_) => Origin::Live,
            Self::Fallback { .. } => Origin::Fallback,
        }
    }

    pub fn data(&self) -> &T {
        match self {
            Self::Live(data) | Self::Fallback { data, .. } => data,
        }
    }

    pub fn into_data(self) -> T {
        match self {
            Self::Live(data) | Self::Fallback { data, .. } => data,
        }
    }

    pub fn reason(&self) -> Option<&FallbackReason> {
        match self {
            Self::Live(_) => None,
            Self::Fallback { reason, .. } => Some(reason),
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }

    /// Transform the payload, keeping origin and reason.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Fetched<U> {
        match self {
            Self::Live(data) => Fetched::Live(f(data)),
            Self::Fallback { data, reason } => Fetched::Fallback {
                data: f(data),
                reason,
            },
        }
    }
}
