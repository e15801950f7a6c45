//! Error types for devclass.
//!
//! All errors use `thiserror` for ergonomic error handling and proper error chains.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for devclass operations.
pub type Result<T> = std::result::Result<T, DevclassError>;

/// Main error type for devclass.
#[derive(Error, Debug)]
pub enum DevclassError {
    // Locator errors
    #[error("Invalid PCI address format: {address} (expected: 0000:01:00.0)")]
    InvalidPciAddress { address: String },

    #[error("Incorrect tokens found while parsing VFIO details: {name}")]
    UnrecognizedDeviceName { name: String },

    // Sysfs errors
    #[error("Failed to read PCI sysfs property {path:?}: {source}")]
    PropertyRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Couldn't stat() configuration space file {path:?}: {source}")]
    ConfigSpaceStat {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to resolve sysfs device link {path:?}: {source}")]
    SymlinkResolution {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read AP matrix {path:?}: {source}")]
    MatrixRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Configuration errors
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },
}

impl DevclassError {
    /// Path of the sysfs node involved in the failure, if any.
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            Self::PropertyRead { path, .. }
            | Self::ConfigSpaceStat { path, .. }
            | Self::SymlinkResolution { path, .. }
            | Self::MatrixRead { path, .. } => Some(path),
            _ => None,
        }
    }
}
