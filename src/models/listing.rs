use serde::{Deserialize, Serialize};
use std::fmt;

// NewType pattern for type safety
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ListingId(pub String);

impl ListingId {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ListingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One listing row as observed on a loaded page.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ListingRecord {
    pub listing_id: ListingId,
    pub price_text: Option<String>,
    pub price: Option<f64>,
    pub raw_attribute_text: Option<String>,
    pub wear_rating: Option<f64>,
    pub pattern_template: Option<String>,
    /// 1-based position within the page.
    pub index_on_page: usize,
}
