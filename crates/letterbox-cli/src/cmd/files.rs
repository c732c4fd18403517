use crate::output::{print_json, print_table};
use crate::session::{self, RepoArgs};
use anyhow::Context;
use std::path::Path;

pub fn run(root: &Path, repo: &RepoArgs, folder: Option<&str>, json: bool) -> anyhow::Result<()> {
    let session = session::open(root, repo)?;
    let folder = folder.unwrap_or(&session.settings().folders.updated_letters);

    let files = session
        .store()
        .list_text_like_files(folder, session.branch())
        .with_context(|| format!("failed to list '{folder}'"))?;

    if json {
        return print_json(&files);
    }
    if files.is_empty() {
        println!("No letter files in '{folder}'.");
        return Ok(());
    }
    let rows = files.into_iter().map(|f| vec![f.name, f.path]).collect();
    print_table(&["NAME", "PATH"], rows);
    Ok(())
}
