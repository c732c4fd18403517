pub mod config;
pub mod files;
pub mod signature;
pub mod wording;

/// Writes need an explicit `--yes`; a dry run never writes.
pub fn require_confirmation(yes: bool, dry_run: bool, what: &str) -> anyhow::Result<()> {
    if yes || dry_run {
        return Ok(());
    }
    anyhow::bail!("confirmation required: re-run with --yes to overwrite {what}, or --dry-run to preview")
}
