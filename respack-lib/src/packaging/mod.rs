use anyhow::{Context, Result};
use log::info;

use crate::error::PackError;
use crate::fs_utils::{encode_size, folder_name, list_entries};
use crate::options::{InvocationOptions, RootedLayout};

pub mod staging;
pub mod zip;

/// Creates the archive described by `opts`.
///
/// Flat archives hold the contents of the source folder directly. Rooted
/// archives nest everything under a folder named after the source, either by
/// prefixing entry names or through a staging copy depending on `opts.layout`.
/// An output that lives inside the source folder is never packed into itself.
pub fn create_archive(opts: &InvocationOptions) -> Result<()> {
    let size = if opts.include_root {
        let root = folder_name(&opts.source)
            .ok_or_else(|| PackError::UnnamedSource(opts.source.clone()))?;

        match opts.layout {
            RootedLayout::Prefixed => {
                let entries = list_entries(&opts.source, Some(&root), Some(&opts.output))?;
                zip::write_zip_sync(&opts.output, entries)?
            }
            RootedLayout::Staged => staging::archive_via_staging(
                &opts.source,
                &root,
                &opts.output,
                &std::env::temp_dir(),
            )?,
        }
    } else {
        let entries = list_entries(&opts.source, None, Some(&opts.output))?;
        zip::write_zip_sync(&opts.output, entries)?
    };

    info!("wrote {} ({})", opts.output.display(), encode_size(size));
    Ok(())
}

/// Runs [`create_archive`] and attaches the output path to any failure.
pub fn create_archive_with_context(opts: &InvocationOptions) -> Result<()> {
    create_archive(opts).with_context(|| format!("packing {}", opts.source.display()))
}
