use crate::models::{Tier, TierSets};

/// Look up a pattern template in the caller's tier sets. Tier 1 is checked first.
///
/// Comparison is on the string form, never numeric.
pub fn classify(pattern_template: &str, tiers: &TierSets) -> Option<Tier> {
    if tiers.tier1.contains(pattern_template) {
        Some(Tier::One)
    } else if tiers.tier2.contains(pattern_template) {
        Some(Tier::Two)
    } else {
        None
    }
}
