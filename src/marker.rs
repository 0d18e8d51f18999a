//! Version marker store
//!
//! A small `tag` file inside each install directory records the last
//! successfully installed release. It is the single source of truth for
//! "is a refresh needed" and is only ever written after extraction has
//! completed, so a present marker always describes a fully extracted tree.
//!
//! File layout, unchanged across tool generations:
//!
//! ```text
//! <version token>
//! commit_sha: <sha>
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::InstallError;

const MARKER_FILE_NAME: &str = "tag";
const COMMIT_SHA_PREFIX: &str = "commit_sha:";

/// The persisted record of the installed release
#[derive(Debug, Clone, PartialEq)]
pub struct VersionMarker {
    /// Comparison key; matching tokens make a refresh a no-op
    pub version_token: String,
    /// Auxiliary metadata, not consulted for the match
    pub commit_sha: String,
}

impl VersionMarker {
    pub fn new(version_token: &str, commit_sha: &str) -> Self {
        Self {
            version_token: version_token.to_string(),
            commit_sha: commit_sha.to_string(),
        }
    }

    /// Marker file path for an install directory
    pub fn path_for(install_dir: &Path) -> PathBuf {
        install_dir.join(MARKER_FILE_NAME)
    }

    /// Read the marker for `install_dir`. An absent file means "no prior
    /// installation" and is the expected steady state on first use, never an
    /// error.
    pub fn read(install_dir: &Path) -> Result<Option<Self>, InstallError> {
        let path = Self::path_for(install_dir);
        if !path.is_file() {
            return Ok(None);
        }

        let content = fs::read_to_string(&path).map_err(|e| InstallError::Marker {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        let mut lines = content.lines();
        let version_token = match lines.next() {
            Some(token) if !token.trim().is_empty() => token.trim().to_string(),
            _ => return Ok(None),
        };
        let commit_sha = lines
            .find_map(|line| line.strip_prefix(COMMIT_SHA_PREFIX))
            .map(|sha| sha.trim().to_string())
            .unwrap_or_default();

        Ok(Some(Self {
            version_token,
            commit_sha,
        }))
    }

    /// Overwrite the marker for `install_dir` with this record
    pub fn write(&self, install_dir: &Path) -> Result<(), InstallError> {
        let path = Self::path_for(install_dir);
        let content = format!(
            "{}\n{} {}\n",
            self.version_token, COMMIT_SHA_PREFIX, self.commit_sha
        );
        fs::write(&path, content).map_err(|e| InstallError::Marker {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }

    /// Exact-equality check on the version token. Deliberately stricter than
    /// scanning lines for a containing substring: a token must match the
    /// recorded one in full.
    pub fn matches(&self, version_token: &str) -> bool {
        self.version_token == version_token
    }
}
