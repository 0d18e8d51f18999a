//! Refresh state machine shared by the concrete installers
//!
//! Per invocation: `CHECK_MARKER -> {MATCH: DONE} | {MISMATCH/ABSENT:
//! RESOLVE -> FETCH -> EXTRACT -> WRITE_MARKER -> DONE}`. Any failure in
//! resolve, fetch, or extract ends the run before `WRITE_MARKER`, so the
//! old marker survives and the next invocation retries instead of silently
//! keeping a stale or broken tree.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::archive::extract_archive;
use crate::errors::InstallError;
use crate::fetch::Fetcher;
use crate::logging::{log_info, log_install, log_warning};
use crate::marker::VersionMarker;
use crate::resolver::{select_asset, ReleaseResolver};

// ============================================================================
// Configuration
// ============================================================================

/// Explicit per-invocation configuration. Passed into the installer entry
/// points; nothing in the core reads ambient global state.
#[derive(Debug, Clone)]
pub struct InstallerConfig {
    /// Explicit tag/release selector; `None` means the feed's latest
    pub selector: Option<String>,
    /// Release feed location
    pub release_url: String,
    /// Directory owned exclusively by this installer
    pub install_dir: PathBuf,
    /// Scratch directory for downloads, emptied of artifacts after use
    pub tmp_dir: PathBuf,
}

/// What to do with a downloaded artifact
#[derive(Debug, Clone)]
pub enum ArtifactAction {
    /// Unpack the archive into the install directory
    Extract { strip_top_level: bool },
    /// Hand a co-downloaded wheel to pip (helper artifact, best-effort)
    PipInstall,
}

/// One artifact to pull out of the resolved release
#[derive(Debug, Clone)]
pub struct ArtifactSpec {
    /// Every keyword must be a substring of the asset name
    pub keywords: Vec<String>,
    pub action: ArtifactAction,
}

impl ArtifactSpec {
    pub fn new<S: AsRef<str>>(keywords: &[S], action: ArtifactAction) -> Self {
        Self {
            keywords: keywords.iter().map(|k| k.as_ref().to_string()).collect(),
            action,
        }
    }
}

/// Result of a refresh run
#[derive(Debug, Clone, PartialEq)]
pub enum RefreshOutcome {
    /// The marker already matches the resolved release; nothing downloaded
    UpToDate,
    /// A new release was extracted and the marker updated
    Installed { version_token: String },
}

// ============================================================================
// Refresh State Machine
// ============================================================================

/// Resolve the target release and bring `config.install_dir` up to date
/// with it, downloading through `fetcher`.
pub fn refresh(
    resolver: &dyn ReleaseResolver,
    fetcher: &Fetcher,
    config: &InstallerConfig,
    artifacts: &[ArtifactSpec],
) -> Result<RefreshOutcome, InstallError> {
    let descriptor = resolver.resolve()?;
    log_info(&format!("Release: {}", descriptor.version_token));

    if let Some(marker) = VersionMarker::read(&config.install_dir)? {
        if marker.matches(&descriptor.version_token) {
            return Ok(RefreshOutcome::UpToDate);
        }
    }

    // Download everything first so a miss on any asset aborts before the
    // install directory is touched.
    let mut downloads: Vec<(PathBuf, &ArtifactAction)> = Vec::new();
    for spec in artifacts {
        let asset = select_asset(&descriptor.assets, &spec.keywords)?;
        let path = fetcher.fetch(&asset.download_url, &config.tmp_dir, &asset.name)?;
        downloads.push((path, &spec.action));
    }

    for (path, action) in &downloads {
        match action {
            ArtifactAction::Extract { strip_top_level } => {
                log_install(&format!(
                    "Extracting {} into {}",
                    path.display(),
                    config.install_dir.display()
                ));
                extract_archive(path, &config.install_dir, *strip_top_level)?;
            }
            ArtifactAction::PipInstall => pip_install(path),
        }
    }

    // Large tarballs should not pile up in the scratch directory across runs
    for (path, _) in &downloads {
        if let Err(e) = fs::remove_file(path) {
            log_warning(&format!("Failed to remove {}: {}", path.display(), e));
        }
    }

    fs::create_dir_all(&config.install_dir).map_err(|e| InstallError::Marker {
        path: config.install_dir.display().to_string(),
        reason: e.to_string(),
    })?;
    VersionMarker::new(&descriptor.version_token, &descriptor.commit_sha)
        .write(&config.install_dir)?;

    Ok(RefreshOutcome::Installed {
        version_token: descriptor.version_token,
    })
}

fn pip_install(wheel: &Path) {
    log_install(&format!("Installing {}", wheel.display()));
    match Command::new("pip3")
        .arg("install")
        .arg(wheel)
        .arg("--no-cache-dir")
        .status()
    {
        Ok(status) if status.success() => {}
        Ok(status) => log_warning(&format!(
            "pip3 install {} exited with {}",
            wheel.display(),
            status
        )),
        Err(e) => log_warning(&format!("Failed to run pip3: {}", e)),
    }
}
