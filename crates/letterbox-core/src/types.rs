use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Location
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Location {
    Denver,
    WSlope,
}

impl Location {
    pub fn all() -> &'static [Location] {
        &[Location::Denver, Location::WSlope]
    }

    /// Lowercase key used in tags and in the signature config.
    pub fn as_str(self) -> &'static str {
        match self {
            Location::Denver => "denver",
            Location::WSlope => "wslope",
        }
    }

    /// Display name used in commit messages.
    pub fn label(self) -> &'static str {
        match self {
            Location::Denver => "Denver",
            Location::WSlope => "WSlope",
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Location {
    type Err = crate::error::LetterboxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "denver" => Ok(Location::Denver),
            "wslope" => Ok(Location::WSlope),
            _ => Err(crate::error::LetterboxError::InvalidLocation(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// WordingScope
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WordingScope {
    DenverOnly,
    WSlopeOnly,
    Both,
}

impl WordingScope {
    /// Locations rewritten by this scope, in replacement order.
    pub fn locations(self) -> &'static [Location] {
        match self {
            WordingScope::DenverOnly => &[Location::Denver],
            WordingScope::WSlopeOnly => &[Location::WSlope],
            WordingScope::Both => &[Location::Denver, Location::WSlope],
        }
    }

    pub fn includes(self, location: Location) -> bool {
        self.locations().contains(&location)
    }

    /// A full rewrite starts again from the base templates; a single-location
    /// update edits the already generated letters.
    pub fn reads_base_templates(self) -> bool {
        matches!(self, WordingScope::Both)
    }

    pub fn label(self) -> &'static str {
        match self {
            WordingScope::DenverOnly => "Denver only",
            WordingScope::WSlopeOnly => "WSlope only",
            WordingScope::Both => "Both Denver & WSlope",
        }
    }
}

impl fmt::Display for WordingScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for WordingScope {
    type Err = crate::error::LetterboxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "denver" | "denver_only" => Ok(WordingScope::DenverOnly),
            "wslope" | "wslope_only" => Ok(WordingScope::WSlopeOnly),
            "both" => Ok(WordingScope::Both),
            _ => Err(crate::error::LetterboxError::InvalidScope(s.to_string())),
        }
    }
}
