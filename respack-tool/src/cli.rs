use clap::Parser;
use respack_lib::{RawArgs, RootedLayout};
use std::ffi::OsString;

const EXAMPLES: &str = "\
Examples:
  respack -s RepoName/TargetFolder
  respack -s RepoName/TargetFolder -o myoutput.zip
  respack -s RepoName/TargetFolder -o ../artifacts/Target.zip --include-root --force";

/// Flags matched without regard to case. `-V` is left alone so it keeps
/// meaning `--version`.
const CASE_INSENSITIVE_FLAGS: &[&str] = &[
    "-s",
    "--source",
    "-o",
    "--output",
    "--include-root",
    "--force",
    "-h",
    "--help",
    "--verbose",
    "--version",
    "--staged-copy",
];

#[derive(Parser, Debug)]
#[command(
    name = "respack",
    author,
    version,
    about = "Resource Packer: pack a folder into a zip archive",
    long_about = None,
    after_help = EXAMPLES
)]
pub struct Cli {
    /// Path to the folder to pack, relative to the current directory or absolute
    #[arg(short, long, num_args = 0..=1, default_missing_value = "")]
    pub source: Option<String>,

    /// Output zip file path, file name or existing directory [default: <folder>.zip in the current directory]
    #[arg(short, long, num_args = 0..=1, default_missing_value = "")]
    pub output: Option<String>,

    /// Include the source folder itself as the top-level entry inside the zip
    #[arg(long, action = clap::ArgAction::SetTrue)]
    pub include_root: bool,

    /// Overwrite an existing output zip without prompting
    #[arg(long, action = clap::ArgAction::SetTrue)]
    pub force: bool,

    /// Build rooted archives from a temporary copy of the source folder
    #[arg(long, hide = true, action = clap::ArgAction::SetTrue)]
    pub staged_copy: bool,

    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(long, action = clap::ArgAction::SetTrue)]
    pub verbose: bool,
}

impl Cli {
    pub fn to_raw_args(&self) -> RawArgs {
        RawArgs {
            source: self.source.clone(),
            output: self.output.clone(),
            include_root: self.include_root,
            force: self.force,
            layout: if self.staged_copy {
                RootedLayout::Staged
            } else {
                RootedLayout::Prefixed
            },
        }
    }
}

/// Lowercases known flag tokens, including the flag part of `flag=value`,
/// so that `--SOURCE=Dir` parses like `--source=Dir`. The program name and
/// every other token pass through untouched.
pub fn normalize_args<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    args.into_iter()
        .enumerate()
        .map(|(i, arg)| if i == 0 { arg } else { normalize_token(arg) })
        .collect()
}

fn normalize_token(arg: OsString) -> OsString {
    let normalized = arg.to_str().and_then(|text| {
        let (flag, value) = match text.split_once('=') {
            Some((flag, value)) => (flag, Some(value)),
            None => (text, None),
        };
        let lower = flag.to_ascii_lowercase();
        if lower == flag || !CASE_INSENSITIVE_FLAGS.contains(&lower.as_str()) {
            return None;
        }
        Some(match value {
            Some(value) => OsString::from(format!("{lower}={value}")),
            None => OsString::from(lower),
        })
    });

    normalized.unwrap_or(arg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Cli {
        let argv = std::iter::once("respack")
            .chain(args.iter().copied())
            .map(OsString::from);
        Cli::try_parse_from(normalize_args(argv)).unwrap()
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn accepts_separate_and_inline_values() {
        let cli = parse(&["-s", "proj", "-o=out/x.zip"]);
        assert_eq!(cli.source.as_deref(), Some("proj"));
        assert_eq!(cli.output.as_deref(), Some("out/x.zip"));

        let cli = parse(&["--source=proj", "--output", "x"]);
        assert_eq!(cli.source.as_deref(), Some("proj"));
        assert_eq!(cli.output.as_deref(), Some("x"));
    }

    #[test]
    fn flag_tokens_ignore_case_but_values_keep_it() {
        let cli = parse(&["--SOURCE=MyProj", "-O", "Out.ZIP", "--Include-Root", "--FORCE"]);
        assert_eq!(cli.source.as_deref(), Some("MyProj"));
        assert_eq!(cli.output.as_deref(), Some("Out.ZIP"));
        assert!(cli.include_root);
        assert!(cli.force);
    }

    #[test]
    fn option_without_value_is_blank() {
        let cli = parse(&["-s"]);
        assert_eq!(cli.source.as_deref(), Some(""));
        let cli = parse(&["-s", "proj", "-o"]);
        assert_eq!(cli.output.as_deref(), Some(""));
    }

    #[test]
    fn hidden_flag_selects_staged_layout() {
        let raw = parse(&["-s", "proj", "--include-root", "--staged-copy"]).to_raw_args();
        assert_eq!(raw.layout, RootedLayout::Staged);
        assert!(raw.include_root);
        assert_eq!(parse(&["-s", "proj"]).to_raw_args().layout, RootedLayout::Prefixed);
    }

    #[test]
    fn unknown_tokens_pass_through() {
        let args = normalize_args(["respack", "-V", "Some=Thing", "-S=Dir"].map(OsString::from));
        assert_eq!(args, ["respack", "-V", "Some=Thing", "-s=Dir"].map(OsString::from));
    }
}
