use once_cell::sync::Lazy;
use regex::Regex;

pub const WEAR_RATING_LABEL: &str = "Wear Rating";
pub const PATTERN_TEMPLATE_LABEL: &str = "Pattern Template";

static WEAR_RATING_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)Wear Rating[:\s]*(\d+(?:[.,]\d+)?)")
        .expect("Invalid wear rating regex")
});

static PATTERN_TEMPLATE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)Pattern Template[:\s]*(\d+)")
        .expect("Invalid pattern template regex")
});

/// Which attribute labels make a tooltip surface count as loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeMode {
    /// Only a parseable wear rating settles the probe.
    Wear,
    /// Either label settles the probe; both values are read from the same surface.
    WearAndPattern,
}

/// Attributes read from one hover tooltip. All fields are `None` when the probe
/// timed out.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttributeReading {
    pub raw_text: Option<String>,
    pub wear_rating: Option<f64>,
    pub pattern_template: Option<String>,
}

/// Read the wear rating that follows its label. The value always uses a decimal
/// comma or dot, never grouping.
pub fn parse_wear_rating(text: &str) -> Option<f64> {
    let captures = WEAR_RATING_REGEX.captures(text)?;
    captures[1]
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// Read the pattern template as an integer and hand it back in canonical
/// decimal form, so `"0661"` and `"661"` compare equal afterwards.
pub fn parse_pattern_template(text: &str) -> Option<String> {
    let captures = PATTERN_TEMPLATE_REGEX.captures(text)?;
    captures[1].parse::<u64>().ok().map(|seed| seed.to_string())
}

/// Decide whether a tooltip surface carries the attributes for `mode` and read them.
pub fn read_tooltip(text: &str, mode: ProbeMode) -> Option<AttributeReading> {
    let has_wear = text.contains(WEAR_RATING_LABEL);

    match mode {
        ProbeMode::Wear => {
            if !has_wear {
                return None;
            }
            let wear = parse_wear_rating(text)?;
            Some(AttributeReading {
                raw_text: Some(text.to_string()),
                wear_rating: Some(wear),
                pattern_template: None,
            })
        }
        ProbeMode::WearAndPattern => {
            if !has_wear && !text.contains(PATTERN_TEMPLATE_LABEL) {
                return None;
            }
            Some(AttributeReading {
                raw_text: Some(text.to_string()),
                wear_rating: parse_wear_rating(text),
                pattern_template: parse_pattern_template(text),
            })
        }
    }
}
