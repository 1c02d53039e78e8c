use std::path::PathBuf;

/// Argument values as they come off the command line, before any validation.
#[derive(Debug, Clone, Default)]
pub struct RawArgs {
    pub source: Option<String>,
    pub output: Option<String>,
    pub include_root: bool,
    pub force: bool,
    pub layout: RootedLayout,
}

/// How a rooted archive gets its top-level folder.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RootedLayout {
    /// Entry names are written with the folder name prefixed.
    #[default]
    Prefixed,
    /// The source is copied into a temporary staging folder which is then
    /// archived as a whole.
    Staged,
}

/// A fully resolved invocation. Both paths are absolute and `output` always
/// ends with `.zip`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationOptions {
    pub source: PathBuf,
    pub output: PathBuf,
    pub include_root: bool,
    pub force: bool,
    pub layout: RootedLayout,
}
