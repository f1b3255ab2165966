use std::fmt;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use super::{AttributeProbe, PageExtractor, PAGE_SIZE};
use crate::browser::{ListingPage, PageSnapshot};
use crate::config::ScanSettings;
use crate::error::ScanError;
use crate::models::{Target, TargetPosition};
use crate::parsers::parse_number;
use crate::storage::SeenListings;
use crate::telegram::{build_message, HitLocation, Notifier};

/// Price above which a threshold scan stops: the configured ceiling, or the
/// cheapest listing plus the tolerance band, whichever is lower.
pub fn stop_price(ceiling: f64, first_price: f64, multiplier: f64) -> f64 {
    ceiling.min(first_price * multiplier)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HaltReason {
    /// A listing above the stop price was reached.
    StoppedByPrice,
    /// The next page failed to load.
    NavigationFailed(String),
    /// The last page announced by the paging links was scanned.
    Exhausted,
}

impl fmt::Display for HaltReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HaltReason::StoppedByPrice => write!(f, "price exceeded stop price"),
            HaltReason::NavigationFailed(reason) => write!(f, "next page failed: {}", reason),
            HaltReason::Exhausted => write!(f, "last page reached"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TargetReport {
    pub listing_name: String,
    pub stop_price: f64,
    pub pages_scanned: usize,
    pub listings_checked: usize,
    /// New matches sent to the notifier, delivered or not.
    pub hits: usize,
    pub delivery_failures: usize,
    pub halt: HaltReason,
}

/// Per-target scan state. The stop price is fixed once the first page is read.
struct ScanState {
    stop_price: f64,
    page_index: usize,
    seen: SeenListings,
}

/// Drives one target's scan: load, extract, filter, dedupe, notify, then either
/// advance a page or halt.
pub struct PaginationController<'a> {
    settings: &'a ScanSettings,
    notifier: &'a dyn Notifier,
}

impl<'a> PaginationController<'a> {
    pub fn new(settings: &'a ScanSettings, notifier: &'a dyn Notifier) -> Self {
        Self { settings, notifier }
    }

    pub async fn scan<P>(
        &self,
        page: &mut P,
        target: &Target,
        position: TargetPosition,
    ) -> Result<TargetReport, ScanError>
    where
        P: ListingPage + ?Sized,
    {
        let name = target.listing_name();
        let listing_url = self.settings.market.listing_url(name).to_string();

        info!("[{}] {}", position, name);
        match target {
            Target::Threshold(t) => info!("Looking for float <= {}", t.float_max),
            Target::Tier(t) => info!(
                "Looking for tier 1 ({} patterns) or tier 2 ({} patterns)",
                t.patterns.tier1.len(),
                t.patterns.tier2.len()
            ),
        }

        page.open(&listing_url)
            .await
            .map_err(|source| ScanError::PageLoad {
                url: listing_url.clone(),
                source,
            })?;
        sleep(self.settings.page_delay.sample()).await;

        let mut snapshot = page.snapshot().await?;
        let (stop_price, last_page) = self.plan(target, &snapshot, &listing_url)?;

        let mut state = ScanState {
            stop_price,
            page_index: 0,
            seen: SeenListings::new(),
        };
        let extractor = PageExtractor::new(AttributeProbe::new(
            self.settings.probe,
            target.probe_mode(),
        ));

        let mut pages_scanned = 0;
        let mut listings_checked = 0;
        let mut hits = 0;
        let mut delivery_failures = 0;

        let halt = loop {
            debug!(
                "Page #{} (start={})",
                state.page_index + 1,
                state.page_index * PAGE_SIZE
            );

            let extraction = extractor
                .extract(page, &snapshot.rows, state.stop_price)
                .await;
            pages_scanned += 1;
            listings_checked += extraction.records.len();

            let location = HitLocation {
                target_position: position,
                page_index: state.page_index,
                listing_url: &listing_url,
            };

            for record in &extraction.records {
                let Some(hit) = target.evaluate(record) else {
                    continue;
                };
                if !state.seen.should_notify(&record.listing_id) {
                    debug!("Listing {} already notified", record.listing_id);
                    continue;
                }

                info!(
                    "FOUND listing {} at #{} ({:?}) price={}",
                    record.listing_id,
                    location.overall_position(record),
                    hit,
                    record.price_text.as_deref().unwrap_or("N/A")
                );

                let message = build_message(target, record, &hit, &location);
                hits += 1;
                if let Err(e) = self.notifier.send(&message).await {
                    error!("Failed to send notification: {}", e);
                    delivery_failures += 1;
                }
            }

            if extraction.stopped_by_price {
                break HaltReason::StoppedByPrice;
            }

            if let Some(last_page) = last_page {
                if state.page_index + 1 >= last_page {
                    break HaltReason::Exhausted;
                }
            }

            state.page_index += 1;
            let next_url = self
                .settings
                .market
                .page_url(name, state.page_index)
                .to_string();

            if let Err(e) = page.open(&next_url).await {
                warn!("Next page failed: {} (stop this target)", e);
                break HaltReason::NavigationFailed(e.to_string());
            }
            sleep(self.settings.page_delay.sample()).await;

            snapshot = match page.snapshot().await {
                Ok(snapshot) => snapshot,
                Err(e) => {
                    warn!("Reading next page failed: {} (stop this target)", e);
                    break HaltReason::NavigationFailed(e.to_string());
                }
            };
        };

        info!(
            "Stop: {} ({} found, {} undelivered)",
            halt, hits, delivery_failures
        );

        Ok(TargetReport {
            listing_name: name.to_string(),
            stop_price: state.stop_price,
            pages_scanned,
            listings_checked,
            hits,
            delivery_failures,
            halt,
        })
    }

    /// Work out the stop price and, for tier targets, how many pages there are.
    fn plan(
        &self,
        target: &Target,
        first_page: &PageSnapshot,
        url: &str,
    ) -> Result<(f64, Option<usize>), ScanError> {
        match target {
            Target::Threshold(_) => {
                let first_price = first_page
                    .first_price_text()
                    .and_then(parse_number)
                    .ok_or_else(|| ScanError::FirstPriceUnreadable {
                        url: url.to_string(),
                    })?;

                let by_first = first_price * self.settings.stop_multiplier;
                let stop = stop_price(
                    self.settings.max_price,
                    first_price,
                    self.settings.stop_multiplier,
                );
                info!(
                    "firstPrice={:.2} | stop at min({:.2}, {:.2}) = {:.2}",
                    first_price, self.settings.max_price, by_first, stop
                );
                Ok((stop, None))
            }
            Target::Tier(_) => {
                // No paging links means everything fits on one page.
                let pages = first_page.last_page.unwrap_or(1).max(1) as usize;
                info!(
                    "Pages: {} | stop at {:.2}",
                    pages, self.settings.max_price
                );
                Ok((self.settings.max_price, Some(pages)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ThresholdTarget, TierSets, TierTarget};
    use crate::scanner::testing::{page_url, test_settings, FakePage, FakeRow, RecordingNotifier};
    use pretty_assertions::assert_eq;

    const REDLINE: &str = "AK-47 | Redline (Field-Tested)";
    const CASE_HARDENED: &str = "AK-47 | Case Hardened (Field-Tested)";

    fn threshold(float_max: f64) -> Target {
        Target::Threshold(ThresholdTarget {
            listing_name: REDLINE.to_string(),
            float_max,
            weapon: Some("AK-47".to_string()),
            skin: Some("Redline".to_string()),
            wear: Some("Field-Tested".to_string()),
        })
    }

    fn tier() -> Target {
        Target::Tier(TierTarget {
            listing_name: CASE_HARDENED.to_string(),
            patterns: TierSets {
                tier1: ["661".to_string()].into(),
                tier2: ["555".to_string()].into(),
            },
        })
    }

    fn wear(value: &str) -> String {
        format!("Exterior: Field-Tested\nWear Rating: {}", value)
    }

    fn pattern(seed: &str) -> String {
        format!("Wear Rating: 0.3\nPattern Template: {}", seed)
    }

    const FIRST: TargetPosition = TargetPosition { index: 1, total: 1 };

    #[test]
    fn stop_price_takes_the_lower_bound() {
        assert!((stop_price(100.0, 50.0, 1.3) - 65.0).abs() < 1e-9);
        assert_eq!(stop_price(100.0, 90.0, 1.3), 100.0);
    }

    #[tokio::test]
    async fn stops_before_probing_the_listing_over_stop_price() {
        let settings = test_settings(10.0, 2.0);
        let notifier = RecordingNotifier::new();
        let mut page = FakePage::new().with_page(
            &page_url(REDLINE, 0),
            vec![
                FakeRow::new("1", "$5.00").tooltip(&wear("0,004")),
                FakeRow::new("2", "$8.00").tooltip(&wear("0,009")),
                FakeRow::new("3", "$200.00").tooltip(&wear("0,001")),
            ],
            None,
        );

        let report = PaginationController::new(&settings, &notifier)
            .scan(&mut page, &threshold(0.01), FIRST)
            .await
            .unwrap();

        assert_eq!(report.stop_price, 10.0);
        assert_eq!(report.halt, HaltReason::StoppedByPrice);
        assert_eq!(report.pages_scanned, 1);
        assert_eq!(report.listings_checked, 2);
        assert_eq!(report.hits, 2);
        assert_eq!(report.delivery_failures, 0);
        assert_eq!(page.probed_ids(), vec!["1", "2"]);
        assert_eq!(page.requested(), &[page_url(REDLINE, 0)]);

        let messages = notifier.messages();
        assert!(messages[0].contains("<b>Float:</b> 0.004"));
        assert!(messages[1].contains("<b>Position:</b> #2"));
    }

    #[tokio::test]
    async fn notifies_each_listing_once_across_pages() {
        let settings = test_settings(100.0, 1.3);
        let notifier = RecordingNotifier::new();
        let mut page = FakePage::new()
            .with_page(
                &page_url(REDLINE, 0),
                vec![
                    FakeRow::new("L1", "$5.00").tooltip(&wear("0.001")),
                    FakeRow::new("L2", "$5.50").tooltip(&wear("0.4")),
                ],
                None,
            )
            .with_page(
                &page_url(REDLINE, 1),
                vec![
                    FakeRow::new("L1", "$5.00").tooltip(&wear("0.001")),
                    FakeRow::new("L3", "$6.00").tooltip(&wear("0.002")),
                    FakeRow::new("L4", "$50.00").tooltip(&wear("0.001")),
                ],
                None,
            );

        let report = PaginationController::new(&settings, &notifier)
            .scan(&mut page, &threshold(0.01), FIRST)
            .await
            .unwrap();

        assert_eq!(report.halt, HaltReason::StoppedByPrice);
        assert_eq!(report.pages_scanned, 2);
        assert_eq!(report.hits, 2);

        let messages = notifier.messages();
        assert_eq!(messages.len(), 2);
        assert!(messages[0].contains("<b>Position:</b> #1"));
        assert!(messages[1].contains("<b>Position:</b> #12"));
    }

    #[tokio::test]
    async fn failed_next_page_ends_the_target_quietly() {
        let settings = test_settings(100.0, 1.3);
        let notifier = RecordingNotifier::new();
        let mut page = FakePage::new().with_page(
            &page_url(REDLINE, 0),
            vec![
                FakeRow::new("1", "$5.00").tooltip(&wear("0.001")),
                FakeRow::new("2", "$5.10").tooltip(&wear("0.5")),
            ],
            Some(5),
        );

        let report = PaginationController::new(&settings, &notifier)
            .scan(&mut page, &threshold(0.01), FIRST)
            .await
            .unwrap();

        assert!(matches!(report.halt, HaltReason::NavigationFailed(_)));
        assert_eq!(report.hits, 1);
        assert_eq!(
            page.requested(),
            &[page_url(REDLINE, 0), page_url(REDLINE, 1)]
        );
    }

    #[tokio::test]
    async fn first_page_failure_is_a_target_error() {
        let settings = test_settings(100.0, 1.3);
        let notifier = RecordingNotifier::new();
        let mut page = FakePage::new();

        let result = PaginationController::new(&settings, &notifier)
            .scan(&mut page, &threshold(0.01), FIRST)
            .await;

        assert!(matches!(result, Err(ScanError::PageLoad { .. })));
        assert!(notifier.messages().is_empty());
    }

    #[tokio::test]
    async fn unreadable_first_price_skips_the_target() {
        let settings = test_settings(100.0, 1.3);
        let notifier = RecordingNotifier::new();
        let mut page = FakePage::new().with_page(
            &page_url(REDLINE, 0),
            vec![FakeRow::new("1", "Sold!").tooltip(&wear("0.001"))],
            None,
        );

        let result = PaginationController::new(&settings, &notifier)
            .scan(&mut page, &threshold(0.01), FIRST)
            .await;

        assert!(matches!(result, Err(ScanError::FirstPriceUnreadable { .. })));
        assert!(page.probed_ids().is_empty());
    }

    #[tokio::test]
    async fn tier_scan_walks_to_the_last_page() {
        let settings = test_settings(100.0, 1.3);
        let notifier = RecordingNotifier::new();
        let mut page = FakePage::new()
            .with_page(
                &page_url(CASE_HARDENED, 0),
                vec![
                    FakeRow::new("1", "$40.00").tooltip(&pattern("661")),
                    FakeRow::new("2", "$45.00").tooltip(&pattern("12")),
                ],
                Some(2),
            )
            .with_page(
                &page_url(CASE_HARDENED, 1),
                vec![
                    FakeRow::new("3", "$60.00").tooltip(&pattern("555")),
                    FakeRow::new("4", "$99.00").tooltip(&pattern("7")),
                ],
                Some(2),
            )
            .with_page(
                &page_url(CASE_HARDENED, 2),
                vec![FakeRow::new("5", "$99.00").tooltip(&pattern("661"))],
                Some(3),
            );

        let report = PaginationController::new(&settings, &notifier)
            .scan(&mut page, &tier(), TargetPosition { index: 2, total: 5 })
            .await
            .unwrap();

        // The multiplier never applies to tier targets.
        assert_eq!(report.stop_price, 100.0);
        assert_eq!(report.halt, HaltReason::Exhausted);
        assert_eq!(report.pages_scanned, 2);
        assert_eq!(report.hits, 2);
        assert_eq!(page.requested().len(), 2);

        let messages = notifier.messages();
        assert!(messages[0].contains("<b>Skin 2/5:</b>"));
        assert!(messages[0].contains("<b>Tier:</b> 1"));
        assert!(messages[1].contains("<b>Pattern:</b> 555"));
        assert!(messages[1].contains("#11 on page 2"));
    }

    #[tokio::test]
    async fn tier_scan_without_paging_links_reads_one_page() {
        let settings = test_settings(100.0, 1.3);
        let notifier = RecordingNotifier::new();
        let mut page = FakePage::new()
            .with_page(
                &page_url(CASE_HARDENED, 0),
                vec![FakeRow::new("1", "$40.00").tooltip(&pattern("661"))],
                None,
            )
            .with_page(
                &page_url(CASE_HARDENED, 1),
                vec![FakeRow::new("2", "$41.00").tooltip(&pattern("661"))],
                None,
            );

        let report = PaginationController::new(&settings, &notifier)
            .scan(&mut page, &tier(), FIRST)
            .await
            .unwrap();

        assert_eq!(report.halt, HaltReason::Exhausted);
        assert_eq!(report.hits, 1);
    }

    #[tokio::test]
    async fn tier_scan_stops_at_the_ceiling() {
        let settings = test_settings(50.0, 1.3);
        let notifier = RecordingNotifier::new();
        let mut page = FakePage::new().with_page(
            &page_url(CASE_HARDENED, 0),
            vec![
                FakeRow::new("1", "$40.00").tooltip(&pattern("661")),
                FakeRow::new("2", "$55.00").tooltip(&pattern("555")),
            ],
            Some(9),
        );

        let report = PaginationController::new(&settings, &notifier)
            .scan(&mut page, &tier(), FIRST)
            .await
            .unwrap();

        assert_eq!(report.halt, HaltReason::StoppedByPrice);
        assert_eq!(report.hits, 1);
        assert_eq!(page.probed_ids(), vec!["1"]);
    }

    #[tokio::test]
    async fn delivery_failure_does_not_stop_the_scan() {
        let settings = test_settings(10.0, 2.0);
        let notifier = RecordingNotifier::failing();
        let mut page = FakePage::new().with_page(
            &page_url(REDLINE, 0),
            vec![
                FakeRow::new("1", "$5.00").tooltip(&wear("0.001")),
                FakeRow::new("2", "$6.00").tooltip(&wear("0.002")),
                FakeRow::new("3", "$11.00"),
            ],
            None,
        );

        let report = PaginationController::new(&settings, &notifier)
            .scan(&mut page, &threshold(0.01), FIRST)
            .await
            .unwrap();

        assert_eq!(report.hits, 2);
        assert_eq!(report.delivery_failures, 2);
        assert_eq!(notifier.messages().len(), 2);
    }
}
