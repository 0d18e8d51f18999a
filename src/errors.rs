//! Error taxonomy for the artifact installers
//!
//! Everything surfaces at the top level as a non-zero exit with a readable
//! message; nothing here is silently swallowed.

use std::fmt;

/// Custom error type for installer operations
#[derive(Debug)]
pub enum InstallError {
    /// A selector matched no release, or a keyword set matched no asset.
    /// Never retried: an unknown tag is a caller error, not a transient fault.
    NotFound { what: String },
    /// Transport or HTTP failure while downloading an artifact
    Download { url: String, reason: String },
    /// Malformed archive or filesystem failure during extraction
    Extraction { archive: String, reason: String },
    /// Version marker file could not be read or written
    Marker { path: String, reason: String },
}

impl fmt::Display for InstallError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InstallError::NotFound { what } => {
                write!(f, "{} is not found", what)
            }
            InstallError::Download { url, reason } => {
                write!(f, "Failed to download '{}': {}", url, reason)
            }
            InstallError::Extraction { archive, reason } => {
                write!(f, "Failed to extract '{}': {}", archive, reason)
            }
            InstallError::Marker { path, reason } => {
                write!(f, "Version marker '{}': {}", path, reason)
            }
        }
    }
}

impl std::error::Error for InstallError {}
