use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::models::{
    ListingMatch, ListingRecord, Target, TargetPosition, EMOJI_FOUND, EMOJI_LINK, EMOJI_PATTERN,
    NOT_AVAILABLE,
};
use crate::scanner::PAGE_SIZE;

/// Where a hit was seen.
#[derive(Debug, Clone, Copy)]
pub struct HitLocation<'a> {
    pub target_position: TargetPosition,
    /// 0-based page index within the target scan.
    pub page_index: usize,
    pub listing_url: &'a str,
}

impl HitLocation<'_> {
    /// Position counted from the cheapest listing across all pages.
    pub fn overall_position(&self, record: &ListingRecord) -> usize {
        self.page_index * PAGE_SIZE + record.index_on_page
    }
}

/// Render the Telegram HTML text for one hit.
pub fn build_message(
    target: &Target,
    record: &ListingRecord,
    hit: &ListingMatch,
    location: &HitLocation<'_>,
) -> String {
    let price = encode_text(record.price_text.as_deref().unwrap_or(NOT_AVAILABLE)).into_owned();
    let link = format!(
        "<a href=\"{}\">{} Open on market</a>",
        encode_double_quoted_attribute(location.listing_url),
        EMOJI_LINK
    );

    let body = match hit {
        ListingMatch::LowFloat { wear_rating } => {
            let (skin, wear, float_max) = match target {
                Target::Threshold(t) => (
                    t.display_name(),
                    t.wear.clone().unwrap_or_else(|| NOT_AVAILABLE.to_string()),
                    t.float_max.to_string(),
                ),
                Target::Tier(t) => (
                    t.listing_name.clone(),
                    NOT_AVAILABLE.to_string(),
                    NOT_AVAILABLE.to_string(),
                ),
            };

            format!(
                "{} <b>Low float found</b>\n\n\
                 <b>Skin:</b> {}\n\
                 <b>Wear:</b> {}\n\
                 <b>Float threshold:</b> {}\n\
                 <b>Float:</b> {}\n\
                 <b>Price:</b> {}\n\
                 <b>Position:</b> #{}",
                EMOJI_FOUND,
                encode_text(&skin),
                encode_text(&wear),
                float_max,
                wear_rating,
                price,
                location.overall_position(record),
            )
        }
        ListingMatch::RarePattern {
            pattern_template,
            tier,
        } => {
            let wear = record
                .wear_rating
                .map(|w| w.to_string())
                .unwrap_or_else(|| NOT_AVAILABLE.to_string());

            format!(
                "{} <b>Rare pattern found</b>\n\n\
                 <b>Skin {}:</b> {}\n\
                 <b>Position:</b> #{} on page {}\n\
                 <b>Pattern:</b> {}\n\
                 <b>Tier:</b> {}\n\
                 <b>Price:</b> {}\n\
                 <b>Float:</b> {}",
                EMOJI_PATTERN,
                location.target_position,
                encode_text(target.listing_name()),
                location.overall_position(record),
                location.page_index + 1,
                encode_text(pattern_template),
                tier,
                price,
                wear,
            )
        }
    };

    format!("{}\n\n{}", body, link)
}
