//! GitHub release feed strategy
//!
//! Resolves a snapshot release through the GitHub releases API by explicit
//! tag. An unknown tag is a caller error: the lookup fails fast with the
//! status code and is never retried.

use serde::Deserialize;

use crate::errors::InstallError;
use crate::resolver::{AssetRef, ReleaseDescriptor, ReleaseResolver};

const USER_AGENT: &str = concat!("toolfetch/", env!("CARGO_PKG_VERSION"));

/// GitHub release metadata
#[derive(Deserialize, Debug, Clone)]
pub struct GithubRelease {
    pub tag_name: String,
    pub target_commitish: String,
    pub assets: Vec<GithubAsset>,
}

/// GitHub release asset
#[derive(Deserialize, Debug, Clone)]
pub struct GithubAsset {
    pub name: String,
    pub browser_download_url: String,
}

impl From<GithubRelease> for ReleaseDescriptor {
    fn from(release: GithubRelease) -> Self {
        ReleaseDescriptor {
            version_token: release.tag_name,
            commit_sha: release.target_commitish,
            assets: release
                .assets
                .into_iter()
                .map(|a| AssetRef {
                    name: a.name,
                    download_url: a.browser_download_url,
                })
                .collect(),
        }
    }
}

/// Resolver for a GitHub-style release listing endpoint
pub struct GithubTagResolver {
    release_url: String,
    tag_name: String,
}

impl GithubTagResolver {
    pub fn new(release_url: &str, tag_name: &str) -> Self {
        Self {
            release_url: release_url.trim_end_matches('/').to_string(),
            tag_name: tag_name.to_string(),
        }
    }
}

impl ReleaseResolver for GithubTagResolver {
    fn resolve(&self) -> Result<ReleaseDescriptor, InstallError> {
        let url = format!("{}/tags/{}", self.release_url, self.tag_name);

        let response = match ureq::get(&url).set("User-Agent", USER_AGENT).call() {
            Ok(response) => response,
            Err(ureq::Error::Status(code, _)) => {
                return Err(InstallError::NotFound {
                    what: format!("snapshot {} (status code: {})", self.tag_name, code),
                });
            }
            Err(e) => {
                return Err(InstallError::Download {
                    url,
                    reason: e.to_string(),
                });
            }
        };

        let release: GithubRelease =
            response.into_json().map_err(|e| InstallError::Download {
                url,
                reason: format!("invalid release JSON: {}", e),
            })?;

        Ok(release.into())
    }
}
