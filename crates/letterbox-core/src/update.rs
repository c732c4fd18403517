//! Batch operations over the letters in a repository.
//!
//! Each file is read, edited and written on its own. A failure on one file
//! is recorded in its [`FileResult`] and the batch moves on; nothing already
//! written is rolled back.

use crate::config::SignatureConfig;
use crate::error::{LetterboxError, Result};
use crate::paragraphs::text_to_html;
use crate::paths;
use crate::session::Session;
use crate::signature::{Signee, TierSet};
use crate::store::{FileRef, WriteAction, WriteOutcome};
use crate::tags::TagPair;
use crate::types::{Location, WordingScope};
use serde::Serialize;
use tracing::{info, warn};

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Compute every edit but write nothing.
    pub dry_run: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Created {
        #[serde(skip_serializing_if = "Option::is_none")]
        commit: Option<String>,
    },
    Updated {
        #[serde(skip_serializing_if = "Option::is_none")]
        commit: Option<String>,
    },
    Unchanged,
    Planned,
    Failed {
        error: String,
    },
}

impl Outcome {
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Created { .. } => "created",
            Outcome::Updated { .. } => "updated",
            Outcome::Unchanged => "unchanged",
            Outcome::Planned => "planned",
            Outcome::Failed { .. } => "failed",
        }
    }

    pub fn detail(&self) -> String {
        match self {
            Outcome::Created { commit } | Outcome::Updated { commit } => {
                commit.clone().unwrap_or_default()
            }
            Outcome::Failed { error } => error.clone(),
            Outcome::Unchanged | Outcome::Planned => String::new(),
        }
    }
}

impl From<WriteOutcome> for Outcome {
    fn from(w: WriteOutcome) -> Self {
        match w.action {
            WriteAction::Created => Outcome::Created { commit: w.commit },
            WriteAction::Updated => Outcome::Updated { commit: w.commit },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FileResult {
    pub file: String,
    pub source: String,
    pub target: String,
    #[serde(flatten)]
    pub outcome: Outcome,
}

impl FileResult {
    pub fn is_failure(&self) -> bool {
        matches!(self.outcome, Outcome::Failed { .. })
    }
}

pub fn count_failures(results: &[FileResult]) -> usize {
    results.iter().filter(|r| r.is_failure()).count()
}

// ---------------------------------------------------------------------------
// Wording
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct WordingRequest {
    pub scope: WordingScope,
    pub denver: Option<String>,
    pub wslope: Option<String>,
    /// Wrap blank-line separated paragraphs in `<p>` before inserting.
    pub html: bool,
}

impl WordingRequest {
    fn text_for(&self, location: Location) -> Option<&str> {
        match location {
            Location::Denver => self.denver.as_deref(),
            Location::WSlope => self.wslope.as_deref(),
        }
    }

    /// Tag pair and final replacement text for every location in scope.
    pub fn edits(&self) -> Result<Vec<(TagPair, String)>> {
        self.scope
            .locations()
            .iter()
            .map(|&location| {
                let text = self
                    .text_for(location)
                    .ok_or_else(|| LetterboxError::MissingWording(location.label().to_string()))?;
                let text = if self.html {
                    text_to_html(text)
                } else {
                    text.to_string()
                };
                Ok((TagPair::wording(location), text))
            })
            .collect()
    }
}

pub fn wording_message(scope: WordingScope) -> String {
    format!("Wording update ({})", scope.label())
}

/// Rewrite the wording blocks of every letter in the source folder and save
/// the results into the updated letters folder.
pub fn update_wording(
    session: &Session,
    request: &WordingRequest,
    options: RunOptions,
) -> Result<Vec<FileResult>> {
    let edits = request.edits()?;
    let folders = &session.settings().folders;
    let source_folder = if request.scope.reads_base_templates() {
        &folders.base_templates
    } else {
        &folders.updated_letters
    };

    let sources = session
        .store()
        .list_text_like_files(source_folder, session.branch())?;
    info!(
        scope = %request.scope,
        folder = %source_folder,
        files = sources.len(),
        store = %session.store().describe(),
        "starting wording update"
    );

    let message = wording_message(request.scope);
    let results = sources
        .iter()
        .map(|source| {
            let target = paths::repo_join(&folders.updated_letters, &source.name);
            apply(session, source, target, &message, options, |text| {
                edits
                    .iter()
                    .try_fold(text.to_string(), |acc, (tags, wording)| {
                        tags.replace(&acc, wording)
                    })
            })
        })
        .collect();
    Ok(results)
}

// ---------------------------------------------------------------------------
// Signatures
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub enum TierSelection {
    Preset(String),
    Custom(Vec<Signee>),
}

pub fn resolve_tiers(
    config: &SignatureConfig,
    location: Location,
    selection: &TierSelection,
) -> Result<TierSet> {
    let set = match selection {
        TierSelection::Preset(name) => TierSet::preset(config.tiers(location, name)?.to_vec())?,
        TierSelection::Custom(signees) => TierSet::custom(signees.clone())?,
    };
    for amount in set.colliding_thresholds() {
        warn!(
            %location,
            min_gift = amount,
            "several signees share a minimum gift; the first listed wins"
        );
    }
    Ok(set)
}

pub fn signature_message(location: Location) -> String {
    format!("Signature update ({})", location.label())
}

/// Replace the location's signature block in every live letter.
pub fn update_signatures(
    session: &Session,
    location: Location,
    tiers: &TierSet,
    options: RunOptions,
) -> Result<Vec<FileResult>> {
    let folder = &session.settings().folders.updated_letters;
    let letters: Vec<FileRef> = session
        .store()
        .list_text_like_files(folder, session.branch())?
        .into_iter()
        .filter(|f| paths::is_live_letter(&f.name))
        .collect();
    info!(
        %location,
        files = letters.len(),
        store = %session.store().describe(),
        "starting signature update"
    );

    let tags = TagPair::signature(location);
    let snippet = tiers.snippet();
    let message = signature_message(location);
    let results = letters
        .iter()
        .map(|letter| {
            apply(session, letter, letter.path.clone(), &message, options, |text| {
                tags.replace(text, &snippet)
            })
        })
        .collect();
    Ok(results)
}

// ---------------------------------------------------------------------------
// Per-file read / edit / write
// ---------------------------------------------------------------------------

fn apply<F>(
    session: &Session,
    source: &FileRef,
    target: String,
    message: &str,
    options: RunOptions,
    edit: F,
) -> FileResult
where
    F: FnOnce(&str) -> Result<String>,
{
    let outcome = match write_one(session, source, &target, message, options, edit) {
        Ok(outcome) => {
            info!(file = %source.name, %target, status = outcome.label(), "letter processed");
            outcome
        }
        Err(e) => {
            warn!(file = %source.name, error = %e, "letter skipped");
            Outcome::Failed {
                error: e.to_string(),
            }
        }
    };
    FileResult {
        file: source.name.clone(),
        source: source.path.clone(),
        target,
        outcome,
    }
}

fn write_one<F>(
    session: &Session,
    source: &FileRef,
    target: &str,
    message: &str,
    options: RunOptions,
    edit: F,
) -> Result<Outcome>
where
    F: FnOnce(&str) -> Result<String>,
{
    let store = session.store();
    let branch = session.branch();
    let doc = store.read(&source.path, branch)?;
    let updated = edit(&doc.text)?;
    let in_place = target == source.path;

    if in_place && updated == doc.text {
        return Ok(Outcome::Unchanged);
    }
    if options.dry_run {
        return Ok(Outcome::Planned);
    }

    let written = if in_place {
        store.update(target, &updated, message, branch, &doc.version)?
    } else {
        store.write_or_create(target, &updated, message, branch)?
    };
    Ok(written.into())
}
