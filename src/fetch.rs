//! Retrying artifact downloader
//!
//! Blocking streamed HTTP download to a local path. Transient failures are
//! retried a bounded number of times with a fixed sleep between attempts;
//! exhausting the retries propagates the last error to the caller.

use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::errors::InstallError;
use crate::logging::{log_download, log_warning};

const USER_AGENT: &str = concat!("toolfetch/", env!("CARGO_PKG_VERSION"));

/// Downloads single remote resources with bounded retry.
#[derive(Debug, Clone)]
pub struct Fetcher {
    /// Additional attempts after the first failure
    pub retries: u32,
    /// Sleep between attempts
    pub retry_delay: Duration,
}

impl Default for Fetcher {
    fn default() -> Self {
        Self {
            retries: 3,
            retry_delay: Duration::from_secs(5),
        }
    }
}

impl Fetcher {
    /// Download `url` into `dest_dir/file_name`, creating the directory if
    /// absent. Re-running overwrites any previous (possibly partial) file.
    pub fn fetch(&self, url: &str, dest_dir: &Path, file_name: &str) -> Result<PathBuf, InstallError> {
        fs::create_dir_all(dest_dir).map_err(|e| InstallError::Download {
            url: url.to_string(),
            reason: format!("failed to create {}: {}", dest_dir.display(), e),
        })?;
        let out_file = dest_dir.join(file_name);

        log_download(&format!("Downloading {} from {}", file_name, url));

        run_with_retry(self.retries, self.retry_delay, || {
            download_once(url, &out_file)
        })?;

        Ok(out_file)
    }
}

/// Runs `op`, retrying up to `retries` more times with `delay` between
/// attempts, and returns the last error once the bound is exhausted.
pub fn run_with_retry<T, F>(retries: u32, delay: Duration, mut op: F) -> Result<T, InstallError>
where
    F: FnMut() -> Result<T, InstallError>,
{
    let mut attempt = 0;
    loop {
        match op() {
            Ok(value) => return Ok(value),
            Err(e) => {
                if attempt == retries {
                    return Err(e);
                }
                attempt += 1;
                log_warning(&format!("{}\nDownload failed. Retrying...", e));
                std::thread::sleep(delay);
            }
        }
    }
}

fn download_once(url: &str, out_file: &Path) -> Result<(), InstallError> {
    let response = ureq::get(url)
        .set("User-Agent", USER_AGENT)
        .call()
        .map_err(|e| InstallError::Download {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    let mut reader = response.into_reader();
    let mut file = fs::File::create(out_file).map_err(|e| InstallError::Download {
        url: url.to_string(),
        reason: format!("failed to create {}: {}", out_file.display(), e),
    })?;

    let mut buffer = [0; 65536];
    loop {
        let bytes_read = reader.read(&mut buffer).map_err(|e| InstallError::Download {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        if bytes_read == 0 {
            break;
        }
        file.write_all(&buffer[..bytes_read])
            .map_err(|e| InstallError::Download {
                url: url.to_string(),
                reason: e.to_string(),
            })?;
    }

    Ok(())
}
