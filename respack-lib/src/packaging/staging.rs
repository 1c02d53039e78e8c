use anyhow::{Context, Result};
use log::{debug, warn};
use std::path::Path;

use super::zip::write_zip_sync;
use crate::fs_utils::{copy_dir_recursive, list_entries};

const STAGING_PREFIX: &str = "packfolder_";

/// Builds a rooted archive by copying `source` into `<staging>/<root_name>`
/// and archiving the staging folder.
///
/// `output` is left out of the copy when it sits inside `source`.
/// The staging folder is created under `temp_base` and removed afterwards
/// whether or not archiving worked. A failed removal is logged and does not
/// change the returned result.
pub fn archive_via_staging(
    source: &Path,
    root_name: &str,
    output: &Path,
    temp_base: &Path,
) -> Result<u64> {
    let staging = tempfile::Builder::new()
        .prefix(STAGING_PREFIX)
        .tempdir_in(temp_base)
        .with_context(|| format!("creating staging directory in {temp_base:?}"))?;
    debug!("staging {} in {}", source.display(), staging.path().display());

    let result = stage_and_archive(source, staging.path(), root_name, output);

    let staging_path = staging.path().to_path_buf();
    if let Err(e) = staging.close() {
        warn!(
            "could not remove staging directory {}: {e}",
            staging_path.display()
        );
    }

    result
}

fn stage_and_archive(
    source: &Path,
    staging_root: &Path,
    root_name: &str,
    output: &Path,
) -> Result<u64> {
    copy_dir_recursive(source, &staging_root.join(root_name), Some(output))?;
    let entries = list_entries(staging_root, None, None)?;
    write_zip_sync(output, entries)
}
