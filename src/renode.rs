//! Renode simulator release installer
//!
//! Pulls a portable build out of the Antmicro builds listing. The tarball
//! nests everything under a single release directory, so extraction strips
//! that top segment to land the payload directly in the install directory.

use crate::errors::InstallError;
use crate::fetch::Fetcher;
use crate::installer::{refresh, ArtifactAction, ArtifactSpec, InstallerConfig, RefreshOutcome};
use crate::listing::DirectoryListingResolver;

pub const DEFAULT_RELEASE_URL: &str = "https://dl.antmicro.com/projects/renode/builds/";

const PORTABLE_TARBALL_KEYWORDS: [&str; 1] = ["linux-portable.tar.gz"];

pub fn default_config() -> InstallerConfig {
    InstallerConfig {
        selector: None,
        release_url: DEFAULT_RELEASE_URL.to_string(),
        install_dir: crate::build_path!("renode"),
        tmp_dir: crate::build_path!("tmp"),
    }
}

/// Bring the Renode install up to date with the selected (or latest) build
pub fn install(config: &InstallerConfig) -> Result<RefreshOutcome, InstallError> {
    let resolver = DirectoryListingResolver::new(&config.release_url, config.selector.as_deref());
    let artifacts = [ArtifactSpec::new(
        &PORTABLE_TARBALL_KEYWORDS,
        ArtifactAction::Extract {
            strip_top_level: true,
        },
    )];
    refresh(&resolver, &Fetcher::default(), config, &artifacts)
}
