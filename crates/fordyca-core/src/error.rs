//! Configuration errors shared by every crate in the workspace.

use std::error::Error;
use std::fmt;

/// Errors detected while validating a configuration struct.
///
/// Each crate's config type (`ArenaConfig`, `CachesConfig`,
/// `SiteSelectionConfig`) reports its violations through this enum so
/// callers see one error type at startup.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// Grid resolution is NaN, infinite, zero, or negative.
    InvalidResolution {
        /// The invalid value.
        value: f64,
    },
    /// A dimension is NaN, non-positive, or smaller than one grid cell.
    InvalidDimension {
        /// Which dimension was rejected.
        name: &'static str,
        /// The invalid value.
        value: f64,
    },
    /// A numeric range has its bounds inverted or non-finite.
    InvalidRange {
        /// Which range was rejected.
        name: &'static str,
        /// Description of what went wrong.
        reason: String,
    },
    /// A scalar parameter is out of its allowed domain.
    InvalidParameter {
        /// Which parameter was rejected.
        name: &'static str,
        /// Description of what went wrong.
        reason: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidResolution { value } => {
                write!(f, "grid resolution must be finite and positive, got {value}")
            }
            Self::InvalidDimension { name, value } => {
                write!(f, "invalid dimension '{name}': {value}")
            }
            Self::InvalidRange { name, reason } => {
                write!(f, "invalid range '{name}': {reason}")
            }
            Self::InvalidParameter { name, reason } => {
                write!(f, "invalid parameter '{name}': {reason}")
            }
        }
    }
}

impl Error for ConfigError {}
