use serde::{Deserialize, Deserializer};
use std::collections::HashSet;
use std::fmt;

use super::ListingRecord;
use crate::parsers::{classify, ProbeMode};

/// One scan unit loaded from the data file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Target {
    Threshold(ThresholdTarget),
    Tier(TierTarget),
}

/// Notify on listings whose wear rating is at or below `float_max`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ThresholdTarget {
    pub listing_name: String,
    pub float_max: f64,
    #[serde(default)]
    pub weapon: Option<String>,
    #[serde(default)]
    pub skin: Option<String>,
    #[serde(default)]
    pub wear: Option<String>,
}

/// Notify on listings whose pattern template is in one of the tier sets.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TierTarget {
    pub listing_name: String,
    pub patterns: TierSets,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TierSets {
    #[serde(default, deserialize_with = "pattern_ids")]
    pub tier1: HashSet<String>,
    #[serde(default, deserialize_with = "pattern_ids")]
    pub tier2: HashSet<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    One,
    Two,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tier::One => write!(f, "1"),
            Tier::Two => write!(f, "2"),
        }
    }
}

/// 1-based position of a target within this worker's shard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetPosition {
    pub index: usize,
    pub total: usize,
}

impl fmt::Display for TargetPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.index, self.total)
    }
}

/// Why a listing qualified for a notification.
#[derive(Debug, Clone, PartialEq)]
pub enum ListingMatch {
    LowFloat { wear_rating: f64 },
    RarePattern { pattern_template: String, tier: Tier },
}

impl Target {
    pub fn listing_name(&self) -> &str {
        match self {
            Target::Threshold(t) => &t.listing_name,
            Target::Tier(t) => &t.listing_name,
        }
    }

    pub fn probe_mode(&self) -> ProbeMode {
        match self {
            Target::Threshold(_) => ProbeMode::Wear,
            Target::Tier(_) => ProbeMode::WearAndPattern,
        }
    }

    /// Apply this target's filter to an extracted record. Records whose attribute
    /// could not be read never match.
    pub fn evaluate(&self, record: &ListingRecord) -> Option<ListingMatch> {
        match self {
            Target::Threshold(t) => record
                .wear_rating
                .filter(|wear| *wear <= t.float_max)
                .map(|wear_rating| ListingMatch::LowFloat { wear_rating }),
            Target::Tier(t) => {
                let pattern = record.pattern_template.as_deref()?;
                let tier = classify(pattern, &t.patterns)?;
                Some(ListingMatch::RarePattern {
                    pattern_template: pattern.to_string(),
                    tier,
                })
            }
        }
    }
}

impl ThresholdTarget {
    /// "Weapon | Skin" when the sheet columns are present, the market name otherwise.
    pub fn display_name(&self) -> String {
        match (self.weapon.as_deref(), self.skin.as_deref()) {
            (Some(weapon), Some(skin)) if !weapon.is_empty() && !skin.is_empty() => {
                format!("{} | {}", weapon, skin)
            }
            _ => self.listing_name.clone(),
        }
    }
}

/// Pattern ids arrive as strings from the sheet export and occasionally as bare
/// numbers from hand-edited files.
fn pattern_ids<'de, D>(deserializer: D) -> Result<HashSet<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum PatternId {
        Text(String),
        Number(u64),
    }

    let ids = Vec::<PatternId>::deserialize(deserializer)?;
    Ok(ids
        .into_iter()
        .filter_map(|id| match id {
            PatternId::Text(text) => {
                let trimmed = text.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
            PatternId::Number(number) => Some(number.to_string()),
        })
        .collect())
}
