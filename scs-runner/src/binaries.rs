//! Fetching and unpacking the binary distributions.

use scs_core::{Distribution, ExecRequest, Layout, Result, SetupConfig, SetupError};
use std::io::ErrorKind;
use std::path::Path;
use tokio::fs;

/// `curl <url> -o <archive>`, run inside the binaries dir.
pub fn download_request(
    dist: Distribution,
    layout: &Layout,
    config: &SetupConfig,
) -> Result<ExecRequest> {
    let url = config.require(dist.url_key())?;
    Ok(ExecRequest::new(config.curl_program(), layout.binaries_dir())
        .args([url, "-o", dist.archive_name()]))
}

/// Extract an archive into its install dir, dropping the archive's top-level folder.
pub fn extract_request(dist: Distribution, layout: &Layout, config: &SetupConfig) -> ExecRequest {
    ExecRequest::new(config.tar_program(), layout.binaries_dir()).args([
        "zxvf",
        dist.archive_name(),
        "-C",
        dist.name(),
        "--strip-components=1",
    ])
}

/// Remove `dir` with everything under it, then create it again empty.
pub async fn recreate_dir(dir: &Path) -> Result<()> {
    match fs::remove_dir_all(dir).await {
        Ok(()) => {}
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => return Err(SetupError::fs(dir, e)),
    }
    fs::create_dir_all(dir)
        .await
        .map_err(|e| SetupError::fs(dir, e))
}
