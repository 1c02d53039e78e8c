use anyhow::{Context, Result};
use log::{debug, warn};
use std::{
    ffi::OsString,
    fs,
    path::{Path, PathBuf},
};

/// Whether an archive entry carries file data or marks an empty directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Dir,
}

/// Represents one entry to write into the ZIP archive.
#[derive(Debug, Clone)]
pub struct ArchiveEntry {
    pub path: PathBuf,
    pub name_in_archive: String,
    pub kind: EntryKind,
}

/// Last component of `path` as a string, used to name archives and rooted entries.
pub fn folder_name(path: &Path) -> Option<String> {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .filter(|name| !name.is_empty())
}

/// Splits the children of `dir` into files and subdirectories, each sorted by name.
///
/// `skip` is left out of both lists. Symlinked directories are not followed,
/// so a link pointing back up the tree cannot loop.
fn read_sorted(
    dir: &Path,
    skip: Option<&Path>,
) -> Result<(Vec<(OsString, PathBuf)>, Vec<(OsString, PathBuf)>)> {
    let mut files = Vec::new();
    let mut dirs = Vec::new();

    for entry in fs::read_dir(dir).with_context(|| format!("reading directory {dir:?}"))? {
        let entry = entry.with_context(|| format!("reading directory {dir:?}"))?;
        let path = entry.path();
        if skip == Some(path.as_path()) {
            debug!("skipping {}", path.display());
            continue;
        }

        let file_type = entry
            .file_type()
            .with_context(|| format!("reading file type of {path:?}"))?;
        if file_type.is_dir() {
            dirs.push((entry.file_name(), path));
        } else if file_type.is_symlink() {
            match fs::metadata(&path) {
                Ok(target) if target.is_file() => files.push((entry.file_name(), path)),
                _ => warn!("skipping symlink {} (directory or dangling)", path.display()),
            }
        } else {
            files.push((entry.file_name(), path));
        }
    }

    files.sort();
    dirs.sort();
    Ok((files, dirs))
}

fn join_name(parent: &str, name: &OsString) -> String {
    let name = name.to_string_lossy();
    if parent.is_empty() {
        name.into_owned()
    } else {
        format!("{parent}/{name}")
    }
}

/// Recursively lists everything under `root` as archive entries.
///
/// Names are relative to `root` and use `/` separators. When `prefix` is given
/// every name is nested under it. Files come before subdirectories at each
/// level; directories only get an entry of their own when they are empty.
/// `skip` (typically the archive being written) is never listed.
pub fn list_entries(
    root: &Path,
    prefix: Option<&str>,
    skip: Option<&Path>,
) -> Result<Vec<ArchiveEntry>> {
    fn walk_dir(
        dir: &Path,
        rel: &str,
        skip: Option<&Path>,
        result: &mut Vec<ArchiveEntry>,
    ) -> Result<()> {
        let (files, dirs) = read_sorted(dir, skip)?;

        if files.is_empty() && dirs.is_empty() && !rel.is_empty() {
            result.push(ArchiveEntry {
                path: dir.to_path_buf(),
                name_in_archive: format!("{rel}/"),
                kind: EntryKind::Dir,
            });
            return Ok(());
        }

        for (name, path) in files {
            result.push(ArchiveEntry {
                path,
                name_in_archive: join_name(rel, &name),
                kind: EntryKind::File,
            });
        }
        for (name, path) in dirs {
            walk_dir(&path, &join_name(rel, &name), skip, result)?;
        }
        Ok(())
    }

    let mut result = Vec::new();
    walk_dir(root, prefix.unwrap_or(""), skip, &mut result)?;
    debug!("planned {} archive entries from {}", result.len(), root.display());
    Ok(result)
}

/// Copies the tree under `src` into `dst`, creating `dst` as needed.
/// Existing files at the destination are overwritten; `skip` is not copied.
pub fn copy_dir_recursive(src: &Path, dst: &Path, skip: Option<&Path>) -> Result<()> {
    fs::create_dir_all(dst).with_context(|| format!("creating directory {dst:?}"))?;

    let (files, dirs) = read_sorted(src, skip)?;
    for (name, path) in files {
        let target = dst.join(&name);
        fs::copy(&path, &target)
            .with_context(|| format!("copying {path:?} to {target:?}"))?;
    }
    for (name, path) in dirs {
        copy_dir_recursive(&path, &dst.join(&name), skip)?;
    }
    Ok(())
}

/// Convert bytes into a human-friendly string using binary (KiB, MiB, GiB...) units.
pub fn encode_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KiB", "MiB", "GiB", "TiB"];

    let mut size = bytes as f64;
    let mut unit_index = 0;
    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    if unit_index == 0 || size.fract() == 0.0 {
        format!("{:.0} {}", size, UNITS[unit_index])
    } else {
        format!("{:.1} {}", size, UNITS[unit_index])
    }
}
