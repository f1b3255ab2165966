use tokio::time::sleep;
use tracing::{info, warn};

use super::{PaginationController, TargetReport};
use crate::browser::ListingPage;
use crate::config::ScanSettings;
use crate::models::{Target, TargetPosition};
use crate::telegram::Notifier;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    pub targets_scanned: usize,
    pub targets_failed: usize,
    pub hits: usize,
    pub delivery_failures: usize,
    pub reports: Vec<TargetReport>,
}

/// Runs the controller over a shard's targets one at a time, pausing between
/// targets. A failing target is logged and skipped.
pub struct TargetScheduler<'a> {
    settings: &'a ScanSettings,
    controller: PaginationController<'a>,
}

impl<'a> TargetScheduler<'a> {
    pub fn new(settings: &'a ScanSettings, notifier: &'a dyn Notifier) -> Self {
        Self {
            settings,
            controller: PaginationController::new(settings, notifier),
        }
    }

    pub async fn run<P>(&self, page: &mut P, targets: &[Target]) -> RunSummary
    where
        P: ListingPage + ?Sized,
    {
        let mut summary = RunSummary::default();
        let total = targets.len();

        for (i, target) in targets.iter().enumerate() {
            let position = TargetPosition { index: i + 1, total };

            match self.controller.scan(page, target, position).await {
                Ok(report) => {
                    summary.targets_scanned += 1;
                    summary.hits += report.hits;
                    summary.delivery_failures += report.delivery_failures;
                    summary.reports.push(report);
                }
                Err(e) => {
                    warn!("[{}] {} skipped: {}", position, target.listing_name(), e);
                    summary.targets_failed += 1;
                }
            }

            let delay = self.settings.target_delay.sample();
            info!("Sleeping {}s before next target...", delay.as_secs());
            sleep(delay).await;
        }

        summary
    }
}
