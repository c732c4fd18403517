//! GitHub access token lookup.
//!
//! Order: an explicit value, then `GITHUB_TOKEN`, then the first line of
//! `~/.config/letterbox/token`. Blank values are skipped.

use crate::error::{LetterboxError, Result};
use crate::paths;
use std::path::Path;
use tracing::debug;

pub const TOKEN_ENV: &str = "GITHUB_TOKEN";

pub fn resolve_token(explicit: Option<&str>) -> Result<String> {
    let from_env = std::env::var(TOKEN_ENV).ok();
    let home = home::home_dir();
    resolve_from(explicit, from_env.as_deref(), home.as_deref())
}

pub fn resolve_from(
    explicit: Option<&str>,
    from_env: Option<&str>,
    home: Option<&Path>,
) -> Result<String> {
    if let Some(token) = non_blank(explicit) {
        debug!("using explicit token");
        return Ok(token);
    }
    if let Some(token) = non_blank(from_env) {
        debug!("using token from {TOKEN_ENV}");
        return Ok(token);
    }
    if let Some(home) = home {
        let path = paths::token_path(home);
        if path.exists() {
            let data = std::fs::read_to_string(&path)?;
            if let Some(token) = non_blank(data.lines().next()) {
                debug!(path = %path.display(), "using token file");
                return Ok(token);
            }
        }
    }
    Err(LetterboxError::MissingToken)
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
