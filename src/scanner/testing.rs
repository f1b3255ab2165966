//! In-memory browsing session and notifier for driving the scan engine in tests.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use super::{MarketAddress, ProbeSettings};
use crate::browser::{ListingPage, ListingRow, PageSnapshot};
use crate::config::ScanSettings;
use crate::error::BrowserError;
use crate::models::ListingId;
use crate::telegram::Notifier;
use crate::utils::delay::DelayRange;

pub(crate) const FAST_PROBE: ProbeSettings = ProbeSettings {
    attempts: 3,
    interval: Duration::ZERO,
};

pub(crate) const MARKET_BASE: &str = "https://market.test/listings/730/";

pub(crate) fn test_settings(max_price: f64, stop_multiplier: f64) -> ScanSettings {
    ScanSettings {
        max_price,
        stop_multiplier,
        market: MarketAddress::new(MARKET_BASE).unwrap(),
        page_delay: DelayRange::none(),
        target_delay: DelayRange::none(),
        navigation_timeout: Duration::from_secs(1),
        rows_timeout: Duration::from_secs(1),
        probe: FAST_PROBE,
    }
}

pub(crate) fn page_url(listing_name: &str, page_index: usize) -> String {
    MarketAddress::new(MARKET_BASE)
        .unwrap()
        .page_url(listing_name, page_index)
        .to_string()
}

#[derive(Debug, Clone)]
pub(crate) struct FakeRow {
    id: String,
    price: String,
    tooltip: Option<String>,
    has_name: bool,
}

impl FakeRow {
    pub(crate) fn new(id: &str, price: &str) -> Self {
        Self {
            id: id.to_string(),
            price: price.to_string(),
            tooltip: None,
            has_name: true,
        }
    }

    pub(crate) fn tooltip(mut self, text: &str) -> Self {
        self.tooltip = Some(text.to_string());
        self
    }

    pub(crate) fn without_name(mut self) -> Self {
        self.has_name = false;
        self
    }
}

struct FakeListing {
    rows: Vec<FakeRow>,
    last_page: Option<u32>,
}

/// Serves canned listing pages by URL. Panics if a row is hovered while another
/// hover is still active.
#[derive(Default)]
pub(crate) struct FakePage {
    pages: HashMap<String, FakeListing>,
    current: Option<String>,
    hovered: Option<usize>,
    requested: Vec<String>,
    probed: Vec<String>,
    tooltip_reads: usize,
}

impl FakePage {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_page(mut self, url: &str, rows: Vec<FakeRow>, last_page: Option<u32>) -> Self {
        self.pages
            .insert(url.to_string(), FakeListing { rows, last_page });
        self
    }

    pub(crate) fn requested(&self) -> &[String] {
        &self.requested
    }

    pub(crate) fn probed_ids(&self) -> Vec<&str> {
        self.probed.iter().map(String::as_str).collect()
    }

    pub(crate) fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    pub(crate) fn tooltip_reads(&self) -> usize {
        self.tooltip_reads
    }

    fn current_rows(&self) -> Option<&[FakeRow]> {
        let url = self.current.as_ref()?;
        self.pages.get(url).map(|listing| listing.rows.as_slice())
    }
}

#[async_trait]
impl ListingPage for FakePage {
    async fn open(&mut self, url: &str) -> Result<(), BrowserError> {
        self.requested.push(url.to_string());
        self.hovered = None;

        match self.pages.get(url) {
            Some(listing) if !listing.rows.is_empty() => {
                self.current = Some(url.to_string());
                Ok(())
            }
            _ => {
                self.current = None;
                Err(BrowserError::NoListings {
                    url: url.to_string(),
                })
            }
        }
    }

    async fn snapshot(&mut self) -> Result<PageSnapshot, BrowserError> {
        let url = self.current.clone().ok_or_else(|| BrowserError::NoListings {
            url: "about:blank".to_string(),
        })?;
        let listing = &self.pages[&url];

        Ok(PageSnapshot {
            rows: listing
                .rows
                .iter()
                .map(|row| ListingRow {
                    listing_id: ListingId(row.id.clone()),
                    price_text: (!row.price.is_empty()).then(|| row.price.clone()),
                    has_item_name: row.has_name,
                })
                .collect(),
            last_page: listing.last_page,
        })
    }

    async fn hover_row(&mut self, row: usize) -> Result<bool, BrowserError> {
        assert!(
            self.hovered.is_none(),
            "row {row} hovered while row {:?} is still hovered",
            self.hovered
        );

        let Some(fake) = self.current_rows().and_then(|rows| rows.get(row)).cloned() else {
            return Ok(false);
        };
        if !fake.has_name {
            return Ok(false);
        }

        self.hovered = Some(row);
        self.probed.push(fake.id);
        Ok(true)
    }

    async fn unhover_row(&mut self, _row: usize) -> Result<(), BrowserError> {
        self.hovered = None;
        Ok(())
    }

    async fn tooltip_texts(&mut self) -> Result<Vec<String>, BrowserError> {
        self.tooltip_reads += 1;

        let Some(row) = self.hovered else {
            return Ok(Vec::new());
        };
        Ok(self
            .current_rows()
            .and_then(|rows| rows.get(row))
            .and_then(|fake| fake.tooltip.clone())
            .into_iter()
            .collect())
    }
}

/// Keeps every message it is asked to send.
#[derive(Default)]
pub(crate) struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
    failing: bool,
}

impl RecordingNotifier {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Records messages but reports every delivery as failed.
    pub(crate) fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub(crate) fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, message: &str) -> Result<()> {
        self.messages.lock().unwrap().push(message.to_string());
        if self.failing {
            Err(anyhow!("delivery refused"))
        } else {
            Ok(())
        }
    }
}
