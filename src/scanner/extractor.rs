use tracing::debug;

use super::AttributeProbe;
use crate::browser::{ListingPage, ListingRow};
use crate::models::ListingRecord;
use crate::parsers::parse_number;

/// Records extracted from one page, in page order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageExtraction {
    pub records: Vec<ListingRecord>,
    /// A row priced above the stop price cut the page short.
    pub stopped_by_price: bool,
}

pub struct PageExtractor {
    probe: AttributeProbe,
}

impl PageExtractor {
    pub fn new(probe: AttributeProbe) -> Self {
        Self { probe }
    }

    /// Walk `rows` top to bottom, probing each one until a price above
    /// `stop_price` shows up. Rows from that point on are neither probed nor
    /// recorded. Rows whose price can't be read are still probed.
    ///
    /// Probes run strictly one after another; each hover is retracted before the
    /// next row is touched.
    pub async fn extract<P>(&self, page: &mut P, rows: &[ListingRow], stop_price: f64) -> PageExtraction
    where
        P: ListingPage + ?Sized,
    {
        let mut extraction = PageExtraction::default();

        for (row_index, row) in rows.iter().enumerate() {
            let price = row.price_text.as_deref().and_then(parse_number);

            if let Some(price) = price {
                if price > stop_price {
                    debug!(
                        "Row {} priced {:.2} above stop price {:.2}",
                        row_index + 1,
                        price,
                        stop_price
                    );
                    extraction.stopped_by_price = true;
                    break;
                }
            }

            let reading = self.probe.probe(page, row_index).await;

            extraction.records.push(ListingRecord {
                listing_id: row.listing_id.clone(),
                price_text: row.price_text.clone(),
                price,
                raw_attribute_text: reading.raw_text,
                wear_rating: reading.wear_rating,
                pattern_template: reading.pattern_template,
                index_on_page: row_index + 1,
            });
        }

        extraction
    }
}
