use crate::error::{LetterboxError, Result};
use crate::paths;
use crate::signature::{self, Signee};
use crate::types::Location;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

impl ConfigWarning {
    fn warning(message: impl Into<String>) -> Self {
        Self {
            level: WarnLevel::Warning,
            message: message.into(),
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            level: WarnLevel::Error,
            message: message.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// FolderConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FolderConfig {
    #[serde(default = "default_base_templates")]
    pub base_templates: String,
    #[serde(default = "default_updated_letters")]
    pub updated_letters: String,
}

fn default_base_templates() -> String {
    paths::BASE_TEMPLATES_DIR.to_string()
}

fn default_updated_letters() -> String {
    paths::UPDATED_LETTERS_DIR.to_string()
}

impl Default for FolderConfig {
    fn default() -> Self {
        Self {
            base_templates: default_base_templates(),
            updated_letters: default_updated_letters(),
        }
    }
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// Per-checkout settings read from `letterbox.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub repo: Option<String>,
    #[serde(default = "default_branch")]
    pub branch: String,
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default)]
    pub folders: FolderConfig,
    #[serde(default = "default_signatures_path")]
    pub signatures_path: String,
}

fn default_branch() -> String {
    paths::DEFAULT_BRANCH.to_string()
}

fn default_api_url() -> String {
    paths::DEFAULT_API_URL.to_string()
}

fn default_signatures_path() -> String {
    paths::SIGNATURES_CONFIG.to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            owner: None,
            repo: None,
            branch: default_branch(),
            api_url: default_api_url(),
            folders: FolderConfig::default(),
            signatures_path: default_signatures_path(),
        }
    }
}

impl Settings {
    /// Load `letterbox.yaml` from `root`; a missing file means defaults.
    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::settings_path(root);
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(&path)?;
        let settings: Settings = serde_yaml::from_str(&data)?;
        Ok(settings)
    }

    /// `owner/repo` when both are set.
    pub fn repo_slug(&self) -> Option<String> {
        match (self.owner.as_deref(), self.repo.as_deref()) {
            (Some(o), Some(r)) if !o.is_empty() && !r.is_empty() => Some(format!("{o}/{r}")),
            _ => None,
        }
    }

    /// `needs_repo` is false when working on a local checkout.
    pub fn validate(&self, needs_repo: bool) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        if needs_repo && self.repo_slug().is_none() {
            warnings.push(ConfigWarning::warning(
                "owner/repo not set: pass --owner and --repo or use --local",
            ));
        }
        if self.branch.trim().is_empty() {
            warnings.push(ConfigWarning::error("branch must not be empty"));
        }
        if !self.api_url.starts_with("http://") && !self.api_url.starts_with("https://") {
            warnings.push(ConfigWarning::error(format!(
                "api_url '{}' is not an http(s) url",
                self.api_url
            )));
        }
        let base = self.folders.base_templates.trim_matches('/');
        if base == self.folders.updated_letters.trim_matches('/') {
            warnings.push(ConfigWarning::warning(
                "base_templates and updated_letters point at the same folder: full wording updates will overwrite the templates",
            ));
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// SignatureConfig
// ---------------------------------------------------------------------------

/// `config/signatures.json`: location key, then preset name, then tiers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SignatureConfig {
    pub locations: BTreeMap<String, BTreeMap<String, Vec<Signee>>>,
}

impl SignatureConfig {
    pub fn from_json(data: &str) -> Result<Self> {
        Ok(serde_json::from_str(data)?)
    }

    /// Preset names for `location`; an unknown location has none.
    pub fn presets(&self, location: Location) -> Vec<&str> {
        self.locations
            .get(location.as_str())
            .map(|sets| sets.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    pub fn tiers(&self, location: Location, preset: &str) -> Result<&[Signee]> {
        let sets = self
            .locations
            .get(location.as_str())
            .ok_or_else(|| LetterboxError::LocationNotFound(location.as_str().to_string()))?;
        sets.get(preset)
            .map(Vec::as_slice)
            .ok_or_else(|| LetterboxError::PresetNotFound {
                location: location.as_str().to_string(),
                preset: preset.to_string(),
            })
    }

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        for location in self.locations.keys() {
            if location.parse::<Location>().is_err() {
                warnings.push(ConfigWarning::warning(format!(
                    "unknown location '{location}' is never used"
                )));
            }
        }
        for location in Location::all() {
            if !self.locations.contains_key(location.as_str()) {
                warnings.push(ConfigWarning::warning(format!(
                    "no signature sets for location '{location}'"
                )));
            }
        }

        for (location, sets) in &self.locations {
            for (preset, tiers) in sets {
                let at = format!("{location}/{preset}");
                if tiers.is_empty() {
                    warnings.push(ConfigWarning::error(format!("{at}: signature set is empty")));
                }
                for tier in tiers {
                    if !tier.min_gift.is_finite() || tier.min_gift < 0.0 {
                        warnings.push(ConfigWarning::error(format!(
                            "{at}: '{}' has invalid min_gift {}",
                            tier.name, tier.min_gift
                        )));
                    }
                    if tier.name.trim().is_empty() {
                        warnings.push(ConfigWarning::error(format!("{at}: signee without a name")));
                    }
                }
                for amount in signature::colliding_thresholds(tiers) {
                    warnings.push(ConfigWarning::warning(format!(
                        "{at}: several signees share min_gift {amount:.2}; the first listed wins"
                    )));
                }
            }
        }

        warnings
    }
}
