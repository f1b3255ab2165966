pub mod attribute;
pub mod pattern;
pub mod price;

pub use attribute::*;
pub use pattern::*;
pub use price::*;

use html_escape::decode_html_entities;
use once_cell::sync::Lazy;
use regex::Regex;

static STATTRAK_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)StatTrak™\s*").expect("Invalid StatTrak regex"));

static SOUVENIR_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)Souvenir\s*").expect("Invalid souvenir regex"));

static WEAR_SUFFIX_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*\([^)]*\)\s*$").expect("Invalid wear suffix regex"));

/// Clean and normalize text by removing extra whitespace and decoding HTML entities
pub fn clean_text(text: &str) -> String {
    let decoded = decode_html_entities(text);
    decoded
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Strip quality prefixes and the wear suffix from a market name, leaving the
/// name the pattern sheet is keyed by.
///
/// `"StatTrak™ AK-47 | Case Hardened (Field-Tested)"` becomes `"AK-47 | Case Hardened"`.
pub fn base_skin_name(listing_name: &str) -> String {
    let without_stattrak = STATTRAK_REGEX.replace(listing_name, "");
    let without_souvenir = SOUVENIR_REGEX.replace(&without_stattrak, "");
    WEAR_SUFFIX_REGEX
        .replace(&without_souvenir, "")
        .trim()
        .to_string()
}
