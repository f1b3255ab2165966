use async_trait::async_trait;

use crate::error::BrowserError;

pub mod markup;
mod webdriver;

pub use markup::{parse_listing_page, ListingRow, PageSnapshot};
pub use webdriver::WebDriverPage;

/// A single browsing session showing one market listing page at a time.
///
/// Every method takes `&mut self`: the session and its hover tooltip are one
/// mutable surface, so only one navigation, hover or read may be in flight.
#[async_trait]
pub trait ListingPage: Send {
    /// Navigate to `url` and wait until listing rows are rendered.
    async fn open(&mut self, url: &str) -> Result<(), BrowserError>;

    /// Read the rows and the paging hint of the page currently loaded.
    async fn snapshot(&mut self) -> Result<PageSnapshot, BrowserError>;

    /// Point at the item name of row `row` (0-based). Returns `false` when the
    /// row has no name element to hover.
    async fn hover_row(&mut self, row: usize) -> Result<bool, BrowserError>;

    /// Retract the hover on row `row`. The tooltip surface goes away with it.
    async fn unhover_row(&mut self, row: usize) -> Result<(), BrowserError>;

    /// Text of every tooltip surface currently in the document.
    async fn tooltip_texts(&mut self) -> Result<Vec<String>, BrowserError>;
}
