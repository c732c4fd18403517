use crate::cmd::require_confirmation;
use crate::output::report_results;
use crate::session::{self, RepoArgs};
use anyhow::Context;
use clap::Args;
use letterbox_core::types::WordingScope;
use letterbox_core::update::{self, RunOptions, WordingRequest};
use std::io::Read;
use std::path::{Path, PathBuf};

#[derive(Args)]
pub struct WordingArgs {
    /// Which wording to update: denver, wslope, or both
    #[arg(long)]
    scope: WordingScope,

    /// File holding the Denver wording ('-' reads stdin)
    #[arg(long, value_name = "PATH")]
    denver_file: Option<PathBuf>,

    /// File holding the WSlope wording ('-' reads stdin)
    #[arg(long, value_name = "PATH")]
    wslope_file: Option<PathBuf>,

    /// Wrap blank-line separated paragraphs in <p> tags
    #[arg(long)]
    html: bool,

    /// Show what would change without committing
    #[arg(long)]
    dry_run: bool,

    /// Confirm overwriting the wording in every letter
    #[arg(long, short = 'y')]
    yes: bool,
}

pub fn run(root: &Path, repo: &RepoArgs, args: WordingArgs, json: bool) -> anyhow::Result<()> {
    if is_stdin(args.denver_file.as_deref()) && is_stdin(args.wslope_file.as_deref()) {
        anyhow::bail!("only one of --denver-file and --wslope-file can read stdin");
    }
    let request = WordingRequest {
        scope: args.scope,
        denver: read_wording(args.denver_file.as_deref())?,
        wslope: read_wording(args.wslope_file.as_deref())?,
        html: args.html,
    };
    // Surface a missing wording file before asking for confirmation.
    request.edits()?;
    require_confirmation(args.yes, args.dry_run, "wording")?;

    let session = session::open(root, repo)?;
    let results = update::update_wording(
        &session,
        &request,
        RunOptions {
            dry_run: args.dry_run,
        },
    )
    .context("wording update failed")?;

    report_results(&update::wording_message(args.scope), &results, json)
}

fn is_stdin(path: Option<&Path>) -> bool {
    path.is_some_and(|p| p == Path::new("-"))
}

fn read_wording(path: Option<&Path>) -> anyhow::Result<Option<String>> {
    let Some(path) = path else {
        return Ok(None);
    };
    if is_stdin(Some(path)) {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("failed to read wording from stdin")?;
        return Ok(Some(strip_final_newline(text)));
    }
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read wording from {}", path.display()))?;
    Ok(Some(strip_final_newline(text)))
}

/// Editors end files with a newline; the block already gets one before the
/// end tag. Only that single newline is dropped.
fn strip_final_newline(mut text: String) -> String {
    if text.ends_with('\n') {
        text.pop();
        if text.ends_with('\r') {
            text.pop();
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_one_final_newline() {
        assert_eq!(strip_final_newline("wording\n".into()), "wording");
        assert_eq!(strip_final_newline("wording\r\n".into()), "wording");
        assert_eq!(strip_final_newline("wording".into()), "wording");
    }

    #[test]
    fn keeps_deliberate_trailing_blank_lines() {
        assert_eq!(strip_final_newline("wording\n\n".into()), "wording\n");
        assert_eq!(strip_final_newline("a\r\n\r\n".into()), "a\r\n");
        assert_eq!(strip_final_newline("\n".into()), "");
    }
}
