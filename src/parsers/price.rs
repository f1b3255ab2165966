use once_cell::sync::Lazy;
use regex::Regex;

static NUMBER_RUN_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\d[\d\s.,]*")
        .expect("Invalid number regex")
});

static DECIMAL_PREFIX_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d+(?:\.\d*)?")
        .expect("Invalid decimal regex")
});

/// Parse a localized price or number out of display text.
///
/// Only the first run of digits and separators is read, so currency symbols and
/// trailing text are ignored. When both `.` and `,` occur, whichever comes last is
/// the decimal separator and the other one is dropped as a thousands separator.
/// When only `,` occurs it is a decimal comma. The value is the longest leading
/// decimal in the result, so stray trailing punctuation (`10.50.`) is ignored.
pub fn parse_number(text: &str) -> Option<f64> {
    let normalized = text.replace('\u{00A0}', " ");
    let run = NUMBER_RUN_REGEX.find(normalized.trim())?;

    let compact: String = run
        .as_str()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();

    let last_dot = compact.rfind('.');
    let last_comma = compact.rfind(',');

    let canonical = match (last_dot, last_comma) {
        (Some(dot), Some(comma)) if dot > comma => compact.replace(',', ""),
        (Some(_), Some(_)) => compact.replace('.', "").replace(',', "."),
        (None, Some(_)) => compact.replace(',', "."),
        _ => compact,
    };

    DECIMAL_PREFIX_REGEX
        .find(&canonical)?
        .as_str()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}
