use async_trait::async_trait;
use fantoccini::error::CmdError;
use fantoccini::{Client, ClientBuilder, Locator};
use serde_json::{json, Value};
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, info};

use super::markup::{parse_listing_page, PageSnapshot, ITEM_NAME, LISTING_ROW, TOOLTIP_SURFACE};
use super::ListingPage;
use crate::config::{Config, ScanSettings};
use crate::error::BrowserError;

const HOVER_SCRIPT: &str = r#"
    const row = document.querySelectorAll(arguments[0])[arguments[1]];
    if (!row) return false;
    const name = row.querySelector(arguments[2]);
    if (!name) return false;
    name.scrollIntoView({ behavior: 'auto', block: 'center' });
    const rect = name.getBoundingClientRect();
    name.dispatchEvent(new MouseEvent('mouseover', {
        bubbles: true,
        cancelable: true,
        view: window,
        clientX: rect.left + rect.width / 2,
        clientY: rect.top + rect.height / 2,
    }));
    return true;
"#;

const UNHOVER_SCRIPT: &str = r#"
    const row = document.querySelectorAll(arguments[0])[arguments[1]];
    const name = row && row.querySelector(arguments[2]);
    if (name) {
        name.dispatchEvent(new MouseEvent('mouseout', { bubbles: true, cancelable: true, view: window }));
    }
    return true;
"#;

const TOOLTIP_SCRIPT: &str = r#"
    return Array.from(document.querySelectorAll(arguments[0]))
        .map(block => block.innerText || block.textContent || '');
"#;

/// Only a timed-out wait means the page rendered without rows.
fn rows_wait_error(url: &str, error: CmdError) -> BrowserError {
    match error {
        CmdError::WaitTimeout => BrowserError::NoListings {
            url: url.to_string(),
        },
        other => BrowserError::Command(other),
    }
}

/// A Chrome session driven over the WebDriver protocol.
pub struct WebDriverPage {
    client: Client,
    navigation_timeout: Duration,
    rows_timeout: Duration,
}

impl WebDriverPage {
    pub async fn connect(config: &Config, settings: &ScanSettings) -> Result<Self, BrowserError> {
        let mut args = vec![
            "--no-sandbox".to_string(),
            "--disable-setuid-sandbox".to_string(),
            "--window-size=1920,1080".to_string(),
            format!("--user-agent={}", config.user_agent),
        ];
        if config.headless {
            args.push("--headless=new".to_string());
        }

        let mut capabilities = serde_json::Map::new();
        capabilities.insert("goog:chromeOptions".to_string(), json!({ "args": args }));

        info!("Connecting to webdriver at {}", config.webdriver_url);
        let mut builder = ClientBuilder::native();
        builder.capabilities(capabilities);
        let client = builder.connect(&config.webdriver_url).await?;

        Ok(Self {
            client,
            navigation_timeout: settings.navigation_timeout,
            rows_timeout: settings.rows_timeout,
        })
    }

    /// Raw HTML of the page currently loaded.
    pub async fn source(&mut self) -> Result<String, BrowserError> {
        Ok(self.client.source().await?)
    }

    pub async fn close(self) -> Result<(), BrowserError> {
        self.client.close().await?;
        Ok(())
    }
}

#[async_trait]
impl ListingPage for WebDriverPage {
    async fn open(&mut self, url: &str) -> Result<(), BrowserError> {
        debug!("Navigating to {}", url);

        match timeout(self.navigation_timeout, self.client.goto(url)).await {
            Ok(result) => result?,
            Err(_) => {
                return Err(BrowserError::Timeout {
                    url: url.to_string(),
                    timeout: self.navigation_timeout,
                })
            }
        }

        // The row selector never appears when an item has no listings.
        self.client
            .wait()
            .at_most(self.rows_timeout)
            .for_element(Locator::Css(LISTING_ROW))
            .await
            .map_err(|e| rows_wait_error(url, e))?;

        Ok(())
    }

    async fn snapshot(&mut self) -> Result<PageSnapshot, BrowserError> {
        let html = self.client.source().await?;
        Ok(parse_listing_page(&html))
    }

    async fn hover_row(&mut self, row: usize) -> Result<bool, BrowserError> {
        let hovered = self
            .client
            .execute(HOVER_SCRIPT, vec![json!(LISTING_ROW), json!(row), json!(ITEM_NAME)])
            .await?;
        Ok(hovered.as_bool().unwrap_or(false))
    }

    async fn unhover_row(&mut self, row: usize) -> Result<(), BrowserError> {
        self.client
            .execute(UNHOVER_SCRIPT, vec![json!(LISTING_ROW), json!(row), json!(ITEM_NAME)])
            .await?;
        Ok(())
    }

    async fn tooltip_texts(&mut self) -> Result<Vec<String>, BrowserError> {
        let texts = self
            .client
            .execute(TOOLTIP_SCRIPT, vec![json!(TOOLTIP_SURFACE)])
            .await?;

        Ok(match texts {
            Value::Array(items) => items
                .into_iter()
                .filter_map(|item| item.as_str().map(str::to_string))
                .filter(|text| !text.is_empty())
                .collect(),
            _ => Vec::new(),
        })
    }
}
