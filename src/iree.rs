//! IREE host compiler snapshot installer
//!
//! Pulls a snapshot release from the GitHub feed: the TFLite tools wheel
//! (handed to pip) and the linux-x86_64 compiler tarball (extracted into
//! the install directory as-is, no top-level strip).

use crate::errors::InstallError;
use crate::fetch::Fetcher;
use crate::github::GithubTagResolver;
use crate::installer::{refresh, ArtifactAction, ArtifactSpec, InstallerConfig, RefreshOutcome};

pub const DEFAULT_RELEASE_URL: &str = "https://api.github.com/repos/google/iree/releases";
/// Snapshot tag pinned to the compiler commit the build tree is synced to
pub const DEFAULT_TAG: &str = "candidate-20220417.110";

const TFLITE_WHEEL_KEYWORDS: [&str; 3] = ["iree_tools_tflite", "linux", "x86_64.whl"];
const DIST_TARBALL_KEYWORDS: [&str; 1] = ["linux-x86_64.tar"];

pub fn default_config() -> InstallerConfig {
    let install_dir = crate::build_path!("iree_compiler");
    InstallerConfig {
        selector: Some(DEFAULT_TAG.to_string()),
        release_url: DEFAULT_RELEASE_URL.to_string(),
        tmp_dir: install_dir.join("tmp"),
        install_dir,
    }
}

/// Bring the IREE compiler install up to date with the configured snapshot
pub fn install(config: &InstallerConfig) -> Result<RefreshOutcome, InstallError> {
    let tag = config.selector.as_deref().unwrap_or(DEFAULT_TAG);
    let resolver = GithubTagResolver::new(&config.release_url, tag);
    let artifacts = [
        ArtifactSpec::new(&TFLITE_WHEEL_KEYWORDS, ArtifactAction::PipInstall),
        ArtifactSpec::new(
            &DIST_TARBALL_KEYWORDS,
            ArtifactAction::Extract {
                strip_top_level: false,
            },
        ),
    ];
    refresh(&resolver, &Fetcher::default(), config, &artifacts)
}
