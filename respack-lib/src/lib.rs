//! Packs a folder into a zip archive: argument resolution, the overwrite
//! guard and the archive writer behind the `respack` command.

use anyhow::Result;
use std::path::{Path, PathBuf};

pub mod error;
pub mod fs_utils;
pub mod guard;
pub mod options;
pub mod packaging;
pub mod resolve;

pub use error::{EXIT_GENERIC_FAILURE, PackError, exit_code_for};
pub use guard::{Confirm, TerminalPrompt};
pub use options::{InvocationOptions, RawArgs, RootedLayout};

/// Resolves `raw` against `cwd`, clears the way for the output and writes the
/// archive. Returns the absolute path of the created zip.
pub fn pack<C: Confirm + ?Sized>(raw: &RawArgs, cwd: &Path, prompt: &mut C) -> Result<PathBuf> {
    let opts = resolve::resolve(raw, cwd)?;
    guard::check_overwrite(&opts, prompt)?;
    packaging::create_archive_with_context(&opts)?;
    Ok(opts.output)
}
