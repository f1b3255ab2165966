use std::time::Duration;
use tokio::time::sleep;
use tracing::debug;

use crate::browser::ListingPage;
use crate::parsers::{read_tooltip, AttributeReading, ProbeMode};

/// Poll ceiling for the hover tooltip: 40 × 50 ms, about two seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeSettings {
    pub attempts: u32,
    pub interval: Duration,
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self {
            attempts: 40,
            interval: Duration::from_millis(50),
        }
    }
}

/// Reveals a row's hidden attributes by hovering its item name and polling the
/// tooltip surfaces until one carries the expected labels.
#[derive(Debug, Clone, Copy)]
pub struct AttributeProbe {
    settings: ProbeSettings,
    mode: ProbeMode,
}

impl AttributeProbe {
    pub fn new(settings: ProbeSettings, mode: ProbeMode) -> Self {
        Self { settings, mode }
    }

    /// Probe row `row` (0-based). A timeout or a browser hiccup yields an empty
    /// reading rather than an error. The hover is retracted before returning.
    pub async fn probe<P>(&self, page: &mut P, row: usize) -> AttributeReading
    where
        P: ListingPage + ?Sized,
    {
        match page.hover_row(row).await {
            Ok(true) => {}
            Ok(false) => {
                debug!("Row {} has no item name to hover", row + 1);
                return AttributeReading::default();
            }
            Err(e) => {
                debug!("Hover on row {} failed: {}", row + 1, e);
                self.retract(page, row).await;
                return AttributeReading::default();
            }
        }

        let reading = self.poll(page).await;
        self.retract(page, row).await;

        if reading.is_none() {
            debug!(
                "No attribute tooltip for row {} after {} attempts",
                row + 1,
                self.settings.attempts
            );
        }
        reading.unwrap_or_default()
    }

    async fn poll<P>(&self, page: &mut P) -> Option<AttributeReading>
    where
        P: ListingPage + ?Sized,
    {
        for _ in 0..self.settings.attempts {
            sleep(self.settings.interval).await;

            let texts = match page.tooltip_texts().await {
                Ok(texts) => texts,
                Err(e) => {
                    debug!("Tooltip read failed: {}", e);
                    continue;
                }
            };

            if let Some(reading) = texts.iter().find_map(|text| read_tooltip(text, self.mode)) {
                return Some(reading);
            }
        }
        None
    }

    async fn retract<P>(&self, page: &mut P, row: usize)
    where
        P: ListingPage + ?Sized,
    {
        if let Err(e) = page.unhover_row(row).await {
            debug!("Unhover on row {} failed: {}", row + 1, e);
        }
    }
}
