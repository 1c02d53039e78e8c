use log::debug;
use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};

use crate::error::PackError;
use crate::fs_utils::folder_name;
use crate::options::{InvocationOptions, RawArgs};

/// Turns raw argument values into a validated [`InvocationOptions`].
///
/// Relative paths resolve against `cwd`; the process working directory is
/// never consulted. The only filesystem access is reading metadata.
pub fn resolve(raw: &RawArgs, cwd: &Path) -> Result<InvocationOptions, PackError> {
    let source = raw
        .source
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .ok_or(PackError::MissingSource)?;

    let source_path = absolutize(cwd, Path::new(source));
    if !source_path.is_dir() {
        return Err(PackError::SourceNotFound(source_path));
    }

    let default_name = match folder_name(&source_path) {
        Some(name) => format!("{name}.zip"),
        None => return Err(PackError::UnnamedSource(source_path)),
    };

    let output = raw
        .output
        .as_deref()
        .filter(|o| !o.trim().is_empty())
        .unwrap_or(&default_name);

    let candidate = absolutize(cwd, Path::new(output));
    let output_path = if candidate.is_dir() {
        candidate.join(&default_name)
    } else if names_no_file(output) {
        return Err(PackError::OutputPathIncomplete(output.to_string()));
    } else {
        candidate
    };

    let output_path = with_zip_suffix(output_path);
    debug!(
        "resolved source {} -> output {}",
        source_path.display(),
        output_path.display()
    );

    Ok(InvocationOptions {
        source: source_path,
        output: output_path,
        include_root: raw.include_root,
        force: raw.force,
        layout: raw.layout,
    })
}

/// Joins `path` onto `cwd` when relative and removes `.` and `..` lexically.
pub fn absolutize(cwd: &Path, path: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    };

    let mut normalized = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                // `..` at the root stays at the root
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

/// True for values like `out/` or `a/..` that point at a directory which
/// does not exist, leaving nothing to use as a file name.
fn names_no_file(value: &str) -> bool {
    if value.ends_with('/') || value.ends_with(std::path::MAIN_SEPARATOR) {
        return true;
    }
    !matches!(Path::new(value).components().next_back(), Some(Component::Normal(_)))
}

fn with_zip_suffix(path: PathBuf) -> PathBuf {
    let has_suffix = path
        .as_os_str()
        .to_string_lossy()
        .to_ascii_lowercase()
        .ends_with(".zip");
    if has_suffix {
        return path;
    }

    let mut raw: OsString = path.into_os_string();
    raw.push(".zip");
    PathBuf::from(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::{TempDir, tempdir};

    fn workspace() -> TempDir {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("proj/sub")).unwrap();
        fs::write(dir.path().join("proj/a.txt"), "a").unwrap();
        dir
    }

    fn raw(source: &str, output: Option<&str>) -> RawArgs {
        RawArgs {
            source: Some(source.to_string()),
            output: output.map(str::to_string),
            ..RawArgs::default()
        }
    }

    #[test]
    fn missing_or_blank_source_is_rejected() {
        let cwd = workspace();
        let err = resolve(&RawArgs::default(), cwd.path()).unwrap_err();
        assert!(matches!(err, PackError::MissingSource));
        let err = resolve(&raw("   ", None), cwd.path()).unwrap_err();
        assert!(matches!(err, PackError::MissingSource));
    }

    #[test]
    fn source_must_be_an_existing_directory() {
        let cwd = workspace();
        match resolve(&raw("missing-dir", None), cwd.path()) {
            Err(PackError::SourceNotFound(path)) => {
                assert_eq!(path, cwd.path().join("missing-dir"))
            }
            other => panic!("unexpected {other:?}"),
        }
        let err = resolve(&raw("proj/a.txt", None), cwd.path()).unwrap_err();
        assert!(matches!(err, PackError::SourceNotFound(_)));
    }

    #[test]
    fn default_output_lands_in_working_directory() {
        let cwd = workspace();
        let opts = resolve(&raw("proj", None), cwd.path()).unwrap();
        assert_eq!(opts.source, cwd.path().join("proj"));
        assert_eq!(opts.output, cwd.path().join("proj.zip"));

        let blank = resolve(&raw("proj", Some("")), cwd.path()).unwrap();
        assert_eq!(blank.output, cwd.path().join("proj.zip"));
    }

    #[test]
    fn bare_file_name_resolves_against_working_directory() {
        let cwd = workspace();
        let opts = resolve(&raw("proj", Some("bundle.zip")), cwd.path()).unwrap();
        assert_eq!(opts.output, cwd.path().join("bundle.zip"));
    }

    #[test]
    fn existing_directory_output_gets_default_name() {
        let cwd = workspace();
        fs::create_dir(cwd.path().join("artifacts")).unwrap();
        let opts = resolve(&raw("proj", Some("artifacts")), cwd.path()).unwrap();
        assert_eq!(opts.output, cwd.path().join("artifacts/proj.zip"));
    }

    #[test]
    fn zip_suffix_is_appended_once() {
        let cwd = workspace();
        let plain = resolve(&raw("proj", Some("out/bundle")), cwd.path()).unwrap();
        assert_eq!(plain.output, cwd.path().join("out/bundle.zip"));

        let upper = resolve(&raw("proj", Some("out/bundle.ZIP")), cwd.path()).unwrap();
        assert_eq!(upper.output, cwd.path().join("out/bundle.ZIP"));

        let dotted = resolve(&raw("proj", Some("bundle.tar")), cwd.path()).unwrap();
        assert_eq!(dotted.output, cwd.path().join("bundle.tar.zip"));
    }

    #[test]
    fn relative_segments_are_normalized() {
        let cwd = workspace();
        let opts = resolve(&raw("./proj/sub/..", Some("../x/./y.zip")), cwd.path()).unwrap();
        assert_eq!(opts.source, cwd.path().join("proj"));
        assert_eq!(
            opts.output,
            cwd.path().parent().unwrap().join("x/y.zip")
        );
    }

    #[test]
    fn current_directory_source_uses_its_name() {
        let cwd = workspace();
        let proj = cwd.path().join("proj");
        let opts = resolve(&raw(".", None), &proj).unwrap();
        assert_eq!(opts.source, proj);
        assert_eq!(opts.output, proj.join("proj.zip"));
    }

    #[test]
    fn output_without_a_file_name_is_incomplete() {
        let cwd = workspace();
        let err = resolve(&raw("proj", Some("not-yet/")), cwd.path()).unwrap_err();
        assert!(matches!(err, PackError::OutputPathIncomplete(ref v) if v == "not-yet/"));

        let err = resolve(&raw("proj", Some("a/b/")), cwd.path()).unwrap_err();
        assert!(matches!(err, PackError::OutputPathIncomplete(_)));
    }

    #[test]
    fn trailing_parent_segment_lands_on_existing_directory() {
        let cwd = workspace();
        let opts = resolve(&raw("proj", Some("not-yet/..")), cwd.path()).unwrap();
        assert_eq!(opts.output, cwd.path().join("proj.zip"));
    }

    #[test]
    fn flags_pass_through() {
        let cwd = workspace();
        let mut args = raw("proj", None);
        args.include_root = true;
        args.force = true;
        let opts = resolve(&args, cwd.path()).unwrap();
        assert!(opts.include_root);
        assert!(opts.force);
    }

    #[test]
    fn absolutize_keeps_root_on_excess_parents() {
        assert_eq!(
            absolutize(Path::new("/a"), Path::new("../../../b")),
            PathBuf::from("/b")
        );
        assert_eq!(
            absolutize(Path::new("/ignored"), Path::new("/abs/./c")),
            PathBuf::from("/abs/c")
        );
    }
}
