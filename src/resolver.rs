//! Release resolution contract
//!
//! A resolver turns a release feed plus a selector into a concrete
//! `ReleaseDescriptor`. Two strategies exist: the GitHub tag strategy
//! (`github.rs`) and the directory-listing strategy (`listing.rs`). The
//! installer state machine only sees this contract, so either feed can be
//! swapped without touching it.

use crate::errors::InstallError;

/// A single downloadable file within a release
#[derive(Debug, Clone, PartialEq)]
pub struct AssetRef {
    pub name: String,
    pub download_url: String,
}

/// A resolved release: immutable once produced by a resolver
#[derive(Debug, Clone)]
pub struct ReleaseDescriptor {
    /// The single comparison key recorded in the version marker
    pub version_token: String,
    /// Auxiliary metadata kept alongside the token
    pub commit_sha: String,
    pub assets: Vec<AssetRef>,
}

pub trait ReleaseResolver {
    /// Resolve the target release for this feed and selector.
    ///
    /// Resolution failures are caller errors (unknown tag, missing release),
    /// so they fail fast and are never retried.
    fn resolve(&self) -> Result<ReleaseDescriptor, InstallError>;
}

/// Select the first asset whose name contains every keyword. The asset list
/// keeps the feed's ordering, so ties go to the earliest entry.
pub fn select_asset<'a, S: AsRef<str>>(
    assets: &'a [AssetRef],
    keywords: &[S],
) -> Result<&'a AssetRef, InstallError> {
    assets
        .iter()
        .find(|asset| keywords.iter().all(|k| asset.name.contains(k.as_ref())))
        .ok_or_else(|| InstallError::NotFound {
            what: keywords
                .first()
                .map(|k| k.as_ref().to_string())
                .unwrap_or_else(|| "asset".to_string()),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assets() -> Vec<AssetRef> {
        vec![
            AssetRef {
                name: "pkg-linux-x86_64.tar.gz".to_string(),
                download_url: "https://example.com/pkg-linux-x86_64.tar.gz".to_string(),
            },
            AssetRef {
                name: "pkg-macos.tar.gz".to_string(),
                download_url: "https://example.com/pkg-macos.tar.gz".to_string(),
            },
        ]
    }

    #[test]
    fn test_select_asset_all_keywords_must_match() {
        let assets = assets();
        let found = select_asset(&assets, &["linux", "x86_64"]).unwrap();
        assert_eq!(found.name, "pkg-linux-x86_64.tar.gz");
    }

    #[test]
    fn test_select_asset_first_match_wins() {
        let assets = assets();
        let found = select_asset(&assets, &["pkg"]).unwrap();
        assert_eq!(found.name, "pkg-linux-x86_64.tar.gz");
    }

    #[test]
    fn test_select_asset_no_match_is_not_found() {
        let assets = assets();
        let err = select_asset(&assets, &["windows"]).unwrap_err();
        match err {
            InstallError::NotFound { what } => assert_eq!(what, "windows"),
            other => panic!("expected NotFound, got {:?}", other),
        }
    }
}
