mod cmd;
mod output;
mod root;
mod session;

use clap::{Parser, Subcommand};
use cmd::{config::ConfigSubcommand, signature::SignatureSubcommand, wording::WordingArgs};
use session::RepoArgs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "letterbox",
    about = "Update wording and signature blocks in templated letters",
    version,
    propagate_version = true
)]
struct Cli {
    /// Directory holding letterbox.yaml (default: auto-detect)
    #[arg(long, global = true, env = "LETTERBOX_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(flatten)]
    repo: RepoArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List letter files (.txt, .md, .html) in a repository folder
    Files {
        /// Folder to list (default: the updated letters folder)
        #[arg(long)]
        folder: Option<String>,
    },

    /// Replace Denver and/or WSlope wording blocks
    Wording(WordingArgs),

    /// Build and apply tiered signature blocks
    Signature {
        #[command(subcommand)]
        subcommand: SignatureSubcommand,
    },

    /// Inspect and validate configuration
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let root = root::resolve_root(cli.root.as_deref());

    let result = match cli.command {
        Commands::Files { folder } => cmd::files::run(&root, &cli.repo, folder.as_deref(), cli.json),
        Commands::Wording(args) => cmd::wording::run(&root, &cli.repo, args, cli.json),
        Commands::Signature { subcommand } => {
            cmd::signature::run(&root, &cli.repo, subcommand, cli.json)
        }
        Commands::Config { subcommand } => cmd::config::run(&root, &cli.repo, subcommand, cli.json),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
