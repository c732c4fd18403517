use crate::output::print_json;
use crate::session::{self, RepoArgs};
use anyhow::Context;
use clap::Subcommand;
use letterbox_core::config::{ConfigWarning, WarnLevel};
use std::path::Path;

// ---------------------------------------------------------------------------
// Subcommand types
// ---------------------------------------------------------------------------

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Show the effective settings (letterbox.yaml plus flags)
    Show,

    /// Check the settings and the signature config for common mistakes
    Validate,
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub fn run(root: &Path, repo: &RepoArgs, subcmd: ConfigSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        ConfigSubcommand::Show => show(root, repo, json),
        ConfigSubcommand::Validate => validate(root, repo, json),
    }
}

// ---------------------------------------------------------------------------
// show
// ---------------------------------------------------------------------------

fn show(root: &Path, repo: &RepoArgs, json: bool) -> anyhow::Result<()> {
    let settings = session::load_settings(root, repo)?;

    if json {
        return print_json(&settings);
    }

    let store = match &repo.local {
        Some(dir) => format!("local checkout {}", dir.display()),
        None => settings
            .repo_slug()
            .map(|slug| format!("github {slug}"))
            .unwrap_or_else(|| "(not configured)".to_string()),
    };
    println!("store:            {store}");
    println!("branch:           {}", settings.branch);
    println!("api url:          {}", settings.api_url);
    println!("base templates:   {}", settings.folders.base_templates);
    println!("updated letters:  {}", settings.folders.updated_letters);
    println!("signature config: {}", settings.signatures_path);
    Ok(())
}

// ---------------------------------------------------------------------------
// validate
// ---------------------------------------------------------------------------

fn validate(root: &Path, repo: &RepoArgs, json: bool) -> anyhow::Result<()> {
    let settings = session::load_settings(root, repo)?;
    let mut warnings = settings.validate(repo.local.is_none());

    // The signature config lives in the repository, so it can only be checked
    // when a store is reachable.
    let reachable = repo.local.is_some() || settings.repo_slug().is_some();
    if reachable {
        let session = session::open(root, repo)?;
        let (config, _) = session
            .load_signature_config()
            .with_context(|| format!("failed to load '{}'", settings.signatures_path))?;
        warnings.extend(config.validate());
    }

    if json {
        print_json(&serde_json::json!({ "warnings": warnings }))?;
    } else if warnings.is_empty() {
        println!("Config is valid. No warnings.");
    } else {
        print_warnings(&warnings);
    }

    if warnings.iter().any(|w| w.level == WarnLevel::Error) {
        anyhow::bail!("config validation found errors");
    }
    Ok(())
}

fn print_warnings(warnings: &[ConfigWarning]) {
    for w in warnings {
        let prefix = match w.level {
            WarnLevel::Warning => "warning",
            WarnLevel::Error => "error",
        };
        println!("[{prefix}] {}", w.message);
    }
}
