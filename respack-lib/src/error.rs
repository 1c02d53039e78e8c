use std::path::PathBuf;

use thiserror::Error;

/// Exit code used for every failure that is not a [`PackError`].
pub const EXIT_GENERIC_FAILURE: u8 = 1;

/// Failures that are detected before any archive work starts and that the
/// binary reports with a dedicated exit code.
#[derive(Debug, Error)]
pub enum PackError {
    #[error("source folder is required. Use -s or --source to specify it.")]
    MissingSource,

    #[error("source folder not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    #[error("source folder {} has no name to derive an archive name from", .0.display())]
    UnnamedSource(PathBuf),

    #[error("output path does not name a file: {0}")]
    OutputPathIncomplete(String),

    #[error("aborted by user, {} was left untouched", .0.display())]
    OverwriteDeclined(PathBuf),
}

impl PackError {
    pub fn exit_code(&self) -> u8 {
        match self {
            PackError::MissingSource => 2,
            PackError::SourceNotFound(_) => 3,
            PackError::OverwriteDeclined(_) => 4,
            PackError::UnnamedSource(_) | PackError::OutputPathIncomplete(_) => {
                EXIT_GENERIC_FAILURE
            }
        }
    }
}

/// Picks the process exit code for an error coming out of [`crate::pack`].
pub fn exit_code_for(err: &anyhow::Error) -> u8 {
    err.downcast_ref::<PackError>()
        .map_or(EXIT_GENERIC_FAILURE, PackError::exit_code)
}
