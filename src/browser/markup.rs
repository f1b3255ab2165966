use once_cell::sync::Lazy;
use scraper::{Html, Selector};

use crate::models::ListingId;
use crate::parsers::clean_text;

pub const LISTING_ROW: &str = ".market_listing_row.market_recent_listing_row";
pub const LISTING_PRICE: &str = ".market_listing_price.market_listing_price_with_fee";
pub const ITEM_NAME: &str = ".market_listing_item_name";
pub const TOOLTIP_SURFACE: &str = "._3JCkAyd9cnB90tRcDLPp4W";
pub const PAGE_LINK: &str = "#searchResults_links .market_paging_pagelink";

const LISTING_ID_PREFIX: &str = "listing_";

static ROW_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(LISTING_ROW).expect("Invalid listing row selector"));
static PRICE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(LISTING_PRICE).expect("Invalid price selector"));
static NAME_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(ITEM_NAME).expect("Invalid item name selector"));
static PAGE_LINK_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(PAGE_LINK).expect("Invalid page link selector"));

/// One listing row in document order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingRow {
    pub listing_id: ListingId,
    pub price_text: Option<String>,
    pub has_item_name: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageSnapshot {
    pub rows: Vec<ListingRow>,
    /// Number on the last pagination link, when the page renders any.
    pub last_page: Option<u32>,
}

impl PageSnapshot {
    pub fn first_price_text(&self) -> Option<&str> {
        self.rows.first().and_then(|row| row.price_text.as_deref())
    }
}

/// Extract listing rows and the paging hint from a rendered listing page.
pub fn parse_listing_page(html: &str) -> PageSnapshot {
    let document = Html::parse_document(html);

    let rows = document
        .select(&ROW_SELECTOR)
        .map(|row| {
            let listing_id = row
                .value()
                .attr("id")
                .map(|id| id.trim_start_matches(LISTING_ID_PREFIX).to_string())
                .unwrap_or_default();

            let price_text = row
                .select(&PRICE_SELECTOR)
                .next()
                .map(|price| clean_text(&price.text().collect::<String>()))
                .filter(|text| !text.is_empty());

            ListingRow {
                listing_id: ListingId(listing_id),
                price_text,
                has_item_name: row.select(&NAME_SELECTOR).next().is_some(),
            }
        })
        .collect();

    let last_page = document
        .select(&PAGE_LINK_SELECTOR)
        .last()
        .and_then(|link| clean_text(&link.text().collect::<String>()).parse::<u32>().ok());

    PageSnapshot { rows, last_page }
}
