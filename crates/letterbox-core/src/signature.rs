//! Tiered signature blocks.
//!
//! A tier set is rendered as an if / else-if / else chain that the letter
//! templating stage evaluates against `Gift.amount.value`. Each branch fires
//! when the gift is strictly greater than one cent below the tier's minimum,
//! so a gift exactly at the minimum still lands in that tier.

use crate::error::{LetterboxError, Result};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Largest custom tier set accepted from the command line.
pub const MAX_CUSTOM_SIGNEES: usize = 4;

const GIFT_VALUE: &str = "Gift.amount.value";

// ---------------------------------------------------------------------------
// Signee
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signee {
    pub name: String,
    pub title: String,
    pub min_gift: f64,
}

impl Signee {
    pub fn new(name: impl Into<String>, title: impl Into<String>, min_gift: f64) -> Self {
        Self {
            name: name.into(),
            title: title.into(),
            min_gift,
        }
    }

    /// Branch boundary: one cent below the minimum, two decimals.
    pub fn threshold(&self) -> String {
        format!("{:.2}", self.min_gift - 0.01)
    }

    fn push_block(&self, out: &mut Vec<String>) {
        out.push("<p>".to_string());
        out.push(self.name.clone());
        out.push("<br>".to_string());
        out.push(self.title.clone());
        out.push("</p>".to_string());
    }
}

/// Parses `NAME|TITLE|MIN_GIFT`.
impl std::str::FromStr for Signee {
    type Err = LetterboxError;

    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split('|').collect();
        let [name, title, amount] = parts.as_slice() else {
            return Err(LetterboxError::InvalidSignee(s.to_string()));
        };
        let name = name.trim();
        if name.is_empty() {
            return Err(LetterboxError::InvalidSignee(s.to_string()));
        }
        Ok(Signee::new(name, title.trim(), parse_min_gift(amount)?))
    }
}

pub fn parse_min_gift(raw: &str) -> Result<f64> {
    let value: f64 = raw
        .trim()
        .trim_start_matches('$')
        .replace(',', "")
        .parse()
        .map_err(|_| LetterboxError::InvalidMinGift(raw.to_string()))?;
    if !value.is_finite() || value < 0.0 {
        return Err(LetterboxError::InvalidMinGift(raw.to_string()));
    }
    Ok(value)
}

// ---------------------------------------------------------------------------
// TierSet
// ---------------------------------------------------------------------------

/// A sorted, non-empty list of signees ready for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct TierSet {
    tiers: Vec<Signee>,
}

impl TierSet {
    /// Tiers from a named preset. Any size is accepted, only emptiness is not.
    /// Every minimum must be a finite, non-negative amount.
    pub fn preset(tiers: Vec<Signee>) -> Result<Self> {
        if tiers.is_empty() {
            return Err(LetterboxError::EmptyTierSet);
        }
        if let Some(bad) = tiers
            .iter()
            .find(|t| !t.min_gift.is_finite() || t.min_gift < 0.0)
        {
            return Err(LetterboxError::InvalidMinGift(format!(
                "{} ({})",
                bad.min_gift, bad.name
            )));
        }
        Ok(Self {
            tiers: sort_tiers(&tiers),
        })
    }

    /// Tiers typed in by hand, capped at [`MAX_CUSTOM_SIGNEES`].
    pub fn custom(tiers: Vec<Signee>) -> Result<Self> {
        if tiers.is_empty() || tiers.len() > MAX_CUSTOM_SIGNEES {
            return Err(LetterboxError::TierSetSize {
                count: tiers.len(),
                max: MAX_CUSTOM_SIGNEES,
            });
        }
        Self::preset(tiers)
    }

    pub fn tiers(&self) -> &[Signee] {
        &self.tiers
    }

    pub fn snippet(&self) -> String {
        build_snippet(&self.tiers)
    }

    pub fn colliding_thresholds(&self) -> Vec<f64> {
        colliding_thresholds(&self.tiers)
    }
}

// ---------------------------------------------------------------------------
// Snippet building
// ---------------------------------------------------------------------------

/// Stable sort by `min_gift`, highest first.
pub fn sort_tiers(tiers: &[Signee]) -> Vec<Signee> {
    let mut sorted = tiers.to_vec();
    sorted.sort_by(|a, b| {
        b.min_gift
            .partial_cmp(&a.min_gift)
            .unwrap_or(Ordering::Equal)
    });
    sorted
}

/// Render the conditional signature snippet for `tiers`.
///
/// The input is sorted first, so callers may pass tiers in any order. An
/// empty list renders as the empty string.
pub fn build_snippet(tiers: &[Signee]) -> String {
    let tiers = sort_tiers(tiers);
    let last = tiers.len().saturating_sub(1);
    let mut out = Vec::new();

    for (i, tier) in tiers.iter().enumerate() {
        let branches = i < last;
        if branches {
            out.push(format!(
                "{{{{#if (compare {GIFT_VALUE} \">\" {})}}}}",
                tier.threshold()
            ));
        }
        tier.push_block(&mut out);
        if branches {
            out.push("{{else}}".to_string());
        }
    }
    out.extend(std::iter::repeat("{{/if}}".to_string()).take(last));

    out.join("\n")
}

/// `min_gift` values held by more than one tier, highest first.
///
/// Shared minimums produce identical branch thresholds; the earlier tier in
/// input order then shadows the later one.
pub fn colliding_thresholds(tiers: &[Signee]) -> Vec<f64> {
    let sorted = sort_tiers(tiers);
    let mut collisions: Vec<f64> = Vec::new();
    for pair in sorted.windows(2) {
        if pair[0].min_gift == pair[1].min_gift && collisions.last() != Some(&pair[0].min_gift) {
            collisions.push(pair[0].min_gift);
        }
    }
    collisions
}
