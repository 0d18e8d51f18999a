//! Directory-listing release feed strategy
//!
//! Some release feeds are nothing more than a browsable HTML index of
//! portable tarballs. This resolver scrapes anchor hrefs matching the
//! portable-build filename pattern and keeps all of that parsing behind the
//! common `ReleaseResolver` contract.

use regex::Regex;

use crate::errors::InstallError;
use crate::resolver::{AssetRef, ReleaseDescriptor, ReleaseResolver};

const USER_AGENT: &str = concat!("toolfetch/", env!("CARGO_PKG_VERSION"));

/// Resolver for an HTML index of `*.linux-portable.tar.gz` builds
pub struct DirectoryListingResolver {
    release_url: String,
    /// Substring of the wanted release name; `None` selects the latest build
    release_name: Option<String>,
}

impl DirectoryListingResolver {
    pub fn new(release_url: &str, release_name: Option<&str>) -> Self {
        Self {
            release_url: release_url.trim_end_matches('/').to_string(),
            release_name: release_name
                .filter(|name| !name.is_empty())
                .map(str::to_string),
        }
    }
}

impl ReleaseResolver for DirectoryListingResolver {
    fn resolve(&self) -> Result<ReleaseDescriptor, InstallError> {
        let html = match ureq::get(&self.release_url)
            .set("User-Agent", USER_AGENT)
            .call()
        {
            Ok(response) => response.into_string().map_err(|e| InstallError::Download {
                url: self.release_url.clone(),
                reason: e.to_string(),
            })?,
            Err(ureq::Error::Status(code, _)) => {
                return Err(InstallError::NotFound {
                    what: format!("release listing at {} (status code: {})", self.release_url, code),
                });
            }
            Err(e) => {
                return Err(InstallError::Download {
                    url: self.release_url.clone(),
                    reason: e.to_string(),
                });
            }
        };

        let files = parse_listing(&html);
        let release_name = pick_release(&files, self.release_name.as_deref())?;
        descriptor_for(&self.release_url, &release_name)
    }
}

/// Anchor hrefs of portable builds, in the listing's order
fn parse_listing(html: &str) -> Vec<String> {
    let href = Regex::new(r#"href="([^"]*linux-portable\.tar\.gz)""#).unwrap();
    href.captures_iter(html)
        .map(|c| c[1].to_string())
        .collect()
}

/// Pick the release name out of the listed files.
///
/// With a selector, the first file containing it wins. Without one, the
/// wanted build is the *second* entry: this feed publishes the newest build
/// as a symlink entry ahead of it, so index 1 is the latest. That is a quirk
/// of this particular listing, not a general sorting rule.
fn pick_release(files: &[String], selector: Option<&str>) -> Result<String, InstallError> {
    let name = Regex::new(r"(.+?)\.linux-portable\.tar\.gz").unwrap();

    let file = match selector {
        Some(wanted) => files.iter().find(|f| f.contains(wanted)).ok_or_else(|| {
            InstallError::NotFound {
                what: format!("release '{}' in the listing", wanted),
            }
        })?,
        None => files.get(1).ok_or_else(|| InstallError::NotFound {
            what: "latest release in the listing".to_string(),
        })?,
    };

    name.captures(file)
        .map(|c| c[1].to_string())
        .ok_or_else(|| InstallError::NotFound {
            what: format!("release name in '{}'", file),
        })
}

/// Build the descriptor for a release name such as
/// `renode-1.13.0+20220502git8e54b1b`. The embedded `git<hash>` suffix is
/// the auxiliary commit metadata; the full name is the version token.
fn descriptor_for(release_url: &str, release_name: &str) -> Result<ReleaseDescriptor, InstallError> {
    let hash = Regex::new(r"git(.+)$").unwrap();
    let commit_sha = hash
        .captures(release_name)
        .map(|c| c[1].to_string())
        .ok_or_else(|| InstallError::NotFound {
            what: format!("git hash in release name '{}'", release_name),
        })?;

    let artifact_name = format!("{}.linux-portable.tar.gz", release_name);
    let download_url = format!("{}/{}", release_url, artifact_name);

    Ok(ReleaseDescriptor {
        version_token: release_name.to_string(),
        commit_sha,
        assets: vec![AssetRef {
            name: artifact_name,
            download_url,
        }],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING: &str = r#"
<html><body>
<a href="renode-latest.linux-portable.tar.gz">renode-latest.linux-portable.tar.gz</a>
<a href="renode-1.13.0+20220502git8e54b1b.linux-portable.tar.gz">renode-1.13.0+20220502git8e54b1b.linux-portable.tar.gz</a>
<a href="renode-1.12.0+20220314gitc437046.linux-portable.tar.gz">renode-1.12.0+20220314gitc437046.linux-portable.tar.gz</a>
<a href="renode_1.13.0_amd64.deb">renode_1.13.0_amd64.deb</a>
</body></html>
"#;

    #[test]
    fn test_parse_listing_keeps_order_and_pattern() {
        let files = parse_listing(LISTING);
        assert_eq!(files.len(), 3);
        assert_eq!(files[0], "renode-latest.linux-portable.tar.gz");
        assert_eq!(files[2], "renode-1.12.0+20220314gitc437046.linux-portable.tar.gz");
    }

    #[test]
    fn test_latest_is_second_listing_entry() {
        let files = parse_listing(LISTING);
        let release = pick_release(&files, None).unwrap();
        assert_eq!(release, "renode-1.13.0+20220502git8e54b1b");
    }

    #[test]
    fn test_selector_picks_first_containing_match() {
        let files = parse_listing(LISTING);
        let release = pick_release(&files, Some("1.12.0")).unwrap();
        assert_eq!(release, "renode-1.12.0+20220314gitc437046");
    }

    #[test]
    fn test_unknown_selector_is_not_found() {
        let files = parse_listing(LISTING);
        let err = pick_release(&files, Some("9.99.9")).unwrap_err();
        assert!(matches!(err, InstallError::NotFound { .. }));
    }

    #[test]
    fn test_descriptor_token_and_commit() {
        let descriptor =
            descriptor_for("https://builds.example.com", "renode-1.13.0+20220502git8e54b1b")
                .unwrap();
        assert_eq!(descriptor.version_token, "renode-1.13.0+20220502git8e54b1b");
        assert_eq!(descriptor.commit_sha, "8e54b1b");
        assert_eq!(descriptor.assets.len(), 1);
        assert_eq!(
            descriptor.assets[0].download_url,
            "https://builds.example.com/renode-1.13.0+20220502git8e54b1b.linux-portable.tar.gz"
        );
    }

    #[test]
    fn test_release_without_git_suffix_is_rejected() {
        let err = descriptor_for("https://builds.example.com", "renode-1.13.0").unwrap_err();
        assert!(matches!(err, InstallError::NotFound { .. }));
    }
}
