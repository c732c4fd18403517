use crate::cmd::require_confirmation;
use crate::output::{print_json, print_table, report_results};
use crate::session::{self, RepoArgs};
use anyhow::Context;
use clap::{Args, Subcommand};
use letterbox_core::config::SignatureConfig;
use letterbox_core::session::Session;
use letterbox_core::signature::{Signee, TierSet};
use letterbox_core::types::Location;
use letterbox_core::update::{self, RunOptions, TierSelection};
use std::path::Path;

// ---------------------------------------------------------------------------
// Subcommand types
// ---------------------------------------------------------------------------

#[derive(Subcommand)]
pub enum SignatureSubcommand {
    /// List the signature sets defined in the signature config
    Sets {
        /// Only show this location (denver or wslope)
        #[arg(long)]
        location: Option<Location>,
    },

    /// Print the snippet a tier set renders to
    Preview(TierArgs),

    /// Replace the signature block in every live letter
    Apply {
        #[command(flatten)]
        tiers: TierArgs,

        /// Show what would change without committing
        #[arg(long)]
        dry_run: bool,

        /// Confirm overwriting the signature block in every live letter
        #[arg(long, short = 'y')]
        yes: bool,
    },
}

#[derive(Args)]
pub struct TierArgs {
    /// Location whose signature block is replaced (denver or wslope)
    #[arg(long)]
    location: Location,

    /// Named signature set from the signature config
    #[arg(long = "set", value_name = "NAME", conflicts_with = "signees")]
    set: Option<String>,

    /// Custom signee as "NAME|TITLE|MIN_GIFT" (repeat up to 4 times)
    #[arg(long = "signee", value_name = "SIGNEE", required_unless_present = "set")]
    signees: Vec<Signee>,
}

impl TierArgs {
    fn selection(&self) -> TierSelection {
        match &self.set {
            Some(name) => TierSelection::Preset(name.clone()),
            None => TierSelection::Custom(self.signees.clone()),
        }
    }

    /// Custom sets need no repository; presets come from the signature config.
    fn resolve(&self, session: Option<&Session>) -> anyhow::Result<TierSet> {
        let selection = self.selection();
        let config = match (&selection, session) {
            (TierSelection::Preset(_), Some(session)) => load_config(session)?,
            _ => SignatureConfig::default(),
        };
        Ok(update::resolve_tiers(&config, self.location, &selection)?)
    }
}

fn load_config(session: &Session) -> anyhow::Result<SignatureConfig> {
    let (config, _) = session.load_signature_config().with_context(|| {
        format!(
            "failed to load signature config '{}'",
            session.settings().signatures_path
        )
    })?;
    Ok(config)
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub fn run(
    root: &Path,
    repo: &RepoArgs,
    subcmd: SignatureSubcommand,
    json: bool,
) -> anyhow::Result<()> {
    match subcmd {
        SignatureSubcommand::Sets { location } => sets(root, repo, location, json),
        SignatureSubcommand::Preview(tiers) => preview(root, repo, &tiers, json),
        SignatureSubcommand::Apply {
            tiers,
            dry_run,
            yes,
        } => apply(root, repo, &tiers, dry_run, yes, json),
    }
}

// ---------------------------------------------------------------------------
// sets
// ---------------------------------------------------------------------------

fn sets(root: &Path, repo: &RepoArgs, location: Option<Location>, json: bool) -> anyhow::Result<()> {
    let session = session::open(root, repo)?;
    let config = load_config(&session)?;
    let locations: Vec<Location> = match location {
        Some(l) => vec![l],
        None => Location::all().to_vec(),
    };

    let mut rows = Vec::new();
    for location in &locations {
        for preset in config.presets(*location) {
            let tiers = config.tiers(*location, preset)?;
            rows.push((*location, preset.to_string(), tiers.to_vec()));
        }
    }

    if json {
        let value: Vec<_> = rows
            .iter()
            .map(|(location, preset, tiers)| {
                serde_json::json!({
                    "location": location,
                    "set": preset,
                    "signees": tiers,
                })
            })
            .collect();
        return print_json(&value);
    }

    if rows.is_empty() {
        println!("No signature sets defined.");
        return Ok(());
    }
    let table = rows
        .into_iter()
        .map(|(location, preset, tiers)| {
            let names: Vec<String> = tiers
                .iter()
                .map(|t| format!("{} ({:.2})", t.name, t.min_gift))
                .collect();
            vec![location.to_string(), preset, names.join(", ")]
        })
        .collect();
    print_table(&["LOCATION", "SET", "SIGNEES"], table);
    Ok(())
}

// ---------------------------------------------------------------------------
// preview
// ---------------------------------------------------------------------------

fn preview(root: &Path, repo: &RepoArgs, args: &TierArgs, json: bool) -> anyhow::Result<()> {
    let session = match args.selection() {
        TierSelection::Preset(_) => Some(session::open(root, repo)?),
        TierSelection::Custom(_) => None,
    };
    let tiers = args.resolve(session.as_ref())?;
    let snippet = tiers.snippet();

    if json {
        print_json(&serde_json::json!({
            "location": args.location,
            "signees": tiers.tiers(),
            "snippet": snippet,
        }))?;
    } else {
        println!("{snippet}");
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// apply
// ---------------------------------------------------------------------------

fn apply(
    root: &Path,
    repo: &RepoArgs,
    args: &TierArgs,
    dry_run: bool,
    yes: bool,
    json: bool,
) -> anyhow::Result<()> {
    let session = session::open(root, repo)?;
    let tiers = args.resolve(Some(&session))?;
    require_confirmation(yes, dry_run, "signatures")?;

    let results = update::update_signatures(&session, args.location, &tiers, RunOptions { dry_run })
        .context("signature update failed")?;

    report_results(&update::signature_message(args.location), &results, json)
}
