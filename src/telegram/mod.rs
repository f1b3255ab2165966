pub mod message;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use tracing::{debug, error, info};

use crate::config::Config;
use crate::utils::http::create_client;

pub use message::{build_message, HitLocation};

/// Destination for hit notifications. Delivery failures are returned to the
/// caller, which logs them and carries on scanning.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, message: &str) -> Result<()>;
}

pub struct TelegramNotifier {
    client: Client,
    endpoint: String,
    chat_id: String,
}

impl TelegramNotifier {
    pub fn new(client: Client, api_url: &str, token: &str, chat_id: &str) -> Self {
        Self {
            client,
            endpoint: format!("{}/bot{}/sendMessage", api_url.trim_end_matches('/'), token),
            chat_id: chat_id.to_string(),
        }
    }

    /// Returns `None` when the bot token or chat id is missing.
    pub fn from_config(config: &Config) -> Result<Option<Self>> {
        let token = non_empty(config.telegram_token.as_deref());
        let chat_id = non_empty(config.telegram_chat_id.as_deref());

        match (token, chat_id) {
            (Some(token), Some(chat_id)) => {
                let client = create_client(&config.user_agent)?;
                Ok(Some(Self::new(client, &config.telegram_api_url, token, chat_id)))
            }
            _ => Ok(None),
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, message: &str) -> Result<()> {
        let payload = json!({
            "chat_id": self.chat_id,
            "text": message,
            "parse_mode": "HTML",
            "disable_web_page_preview": true
        });

        // The endpoint embeds the bot token, keep it out of error text.
        let response = self
            .client
            .post(&self.endpoint)
            .json(&payload)
            .send()
            .await
            .map_err(|e| anyhow!("Failed to send Telegram message: {}", e.without_url()))?;

        if response.status().is_success() {
            info!("Sent Telegram notification");
            Ok(())
        } else {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
            error!("Telegram API failed with status {}: {}", status, error_text);
            Err(anyhow!("Telegram API failed: {} - {}", status, error_text))
        }
    }
}

/// Used when no Telegram credentials are configured.
pub struct DisabledNotifier;

#[async_trait]
impl Notifier for DisabledNotifier {
    async fn send(&self, _message: &str) -> Result<()> {
        debug!("Telegram not configured, skipping notification");
        Ok(())
    }
}
