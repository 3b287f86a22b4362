//! Simulation error types
//!
//! Everything that can fail in the collision core funnels into
//! [`SimError`]. Well-formed bodies stepped with a finite `dt` never produce
//! one; the variants exist so precondition violations and degenerate
//! geometry surface as values instead of NaNs.

use std::fmt;

/// Unified error type for the simulation
#[derive(Debug)]
pub enum SimError {
    /// A body was created with a non-positive radius, too few corners, etc.
    InvalidBody {
        /// What was wrong with the parameters
        reason: &'static str,
    },
    /// A configuration value is out of range.
    InvalidConfig {
        /// Description of the invalid setting
        reason: &'static str,
    },
    /// A near-zero vector was about to be normalized.
    DegenerateGeometry {
        /// Where the degenerate vector was encountered
        context: &'static str,
    },
    /// JSON (de)serialization of a config or snapshot failed.
    Serde(serde_json::Error),
    /// Reading or writing a file failed.
    Io(std::io::Error),
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidBody { reason } => write!(f, "invalid body: {reason}"),
            Self::InvalidConfig { reason } => write!(f, "invalid config: {reason}"),
            Self::DegenerateGeometry { context } => {
                write!(f, "degenerate geometry in {context}")
            }
            Self::Serde(e) => write!(f, "serialization failed: {e}"),
            Self::Io(e) => write!(f, "i/o failed: {e}"),
        }
    }
}

impl std::error::Error for SimError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Serde(e) => Some(e),
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for SimError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serde(e)
    }
}

impl From<std::io::Error> for SimError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

/// Convenience alias used across the crate
pub type SimResult<T> = Result<T, SimError>;
