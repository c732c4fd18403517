use anyhow::Context;
use clap::Args;
use letterbox_core::{
    config::Settings, github::GitHubStore, local::LocalStore, session::Session, token,
    LetterboxError,
};
use std::path::{Path, PathBuf};

/// Where the letters live. Flags override `letterbox.yaml`.
#[derive(Args, Debug, Clone, Default)]
pub struct RepoArgs {
    /// Repository owner (user or organisation)
    #[arg(long, global = true, env = "LETTERBOX_OWNER")]
    pub owner: Option<String>,

    /// Repository name
    #[arg(long, global = true, env = "LETTERBOX_REPO")]
    pub repo: Option<String>,

    /// Branch to read from and commit to
    #[arg(long, global = true, env = "LETTERBOX_BRANCH")]
    pub branch: Option<String>,

    /// GitHub access token
    #[arg(long, global = true, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Work on a local checkout instead of GitHub
    #[arg(long, global = true, value_name = "DIR")]
    pub local: Option<PathBuf>,
}

/// Settings from `letterbox.yaml` with command-line overrides applied.
pub fn load_settings(root: &Path, args: &RepoArgs) -> anyhow::Result<Settings> {
    let mut settings = Settings::load(root).context("failed to load letterbox.yaml")?;
    if let Some(owner) = &args.owner {
        settings.owner = Some(owner.clone());
    }
    if let Some(repo) = &args.repo {
        settings.repo = Some(repo.clone());
    }
    if let Some(branch) = &args.branch {
        settings.branch = branch.clone();
    }
    Ok(settings)
}

pub fn open(root: &Path, args: &RepoArgs) -> anyhow::Result<Session> {
    let settings = load_settings(root, args)?;

    if let Some(dir) = &args.local {
        tracing::debug!(dir = %dir.display(), "using local checkout");
        return Ok(Session::new(Box::new(LocalStore::new(dir)), settings));
    }

    let (Some(owner), Some(repo)) = (settings.owner.clone(), settings.repo.clone()) else {
        return Err(LetterboxError::RepoNotConfigured.into());
    };
    let token = token::resolve_token(args.token.as_deref())?;
    let store = GitHubStore::new(&settings.api_url, owner, repo, token)
        .context("failed to create GitHub client")?;
    Ok(Session::new(Box::new(store), settings))
}
