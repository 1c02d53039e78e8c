use anyhow::{Context, Result};
use console::Term;
use log::{debug, info};
use std::fs;
use std::io::{self, BufRead, IsTerminal};
use std::path::Path;

use crate::error::PackError;
use crate::options::InvocationOptions;

/// Asks a yes/no question before an existing archive is replaced.
pub trait Confirm {
    fn confirm(&mut self, question: &str) -> Result<bool>;
}

/// Prompts on the controlling terminal.
///
/// The question goes to stdout, or to stderr when only stderr is a terminal
/// (`respack ... > log`). A single keystroke is read when stdin and that
/// stream are terminals; otherwise, or when the keystroke read fails, the
/// first character of the next line is used. Only `y` or `Y` counts as yes;
/// end of input is no.
#[derive(Debug, Default)]
pub struct TerminalPrompt;

impl Confirm for TerminalPrompt {
    fn confirm(&mut self, question: &str) -> Result<bool> {
        let term = prompt_term();
        term.write_str(question)?;

        let key = if std::io::stdin().is_terminal() && term.is_term() {
            Some(term.read_char())
        } else {
            None
        };
        let answer = read_answer(key, &mut std::io::stdin().lock())?;
        term.write_line("")?;

        Ok(is_yes(answer))
    }
}

fn prompt_term() -> Term {
    let stdout = Term::stdout();
    if stdout.is_term() {
        return stdout;
    }
    let stderr = Term::stderr();
    if stderr.is_term() { stderr } else { stdout }
}

/// Uses the keystroke when one was read, otherwise the first character of the
/// next line from `input`. `None` means end of input.
fn read_answer<R: BufRead>(key: Option<io::Result<char>>, input: &mut R) -> Result<Option<char>> {
    match key {
        Some(Ok(c)) => return Ok(Some(c)),
        Some(Err(e)) => debug!("single key read failed, reading a line instead: {e}"),
        None => {}
    }

    let mut line = String::new();
    input
        .read_line(&mut line)
        .context("reading overwrite answer")?;
    Ok(line.chars().next())
}

fn is_yes(answer: Option<char>) -> bool {
    matches!(answer, Some('y' | 'Y'))
}

/// Decides whether archiving may replace `opts.output`, then makes sure the
/// destination directory exists.
pub fn check_overwrite<C: Confirm + ?Sized>(opts: &InvocationOptions, prompt: &mut C) -> Result<()> {
    if opts.output.is_file() {
        if opts.force {
            info!("replacing existing {}", opts.output.display());
        } else {
            let question = format!(
                "File {} already exists. Overwrite? (y/N): ",
                opts.output.display()
            );
            if !prompt.confirm(&question)? {
                return Err(PackError::OverwriteDeclined(opts.output.clone()).into());
            }
        }
    }

    ensure_parent_dir(&opts.output)
}

/// Creates parent directories if they don't exist.
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating output directory {parent:?}"))?;
    }
    Ok(())
}
