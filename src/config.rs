use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{info, warn};

use crate::error::ConfigError;
use crate::models::{Target, TierSets, TierTarget};
use crate::parsers::{base_skin_name, parse_number};
use crate::scanner::{MarketAddress, ProbeSettings};
use crate::utils::delay::DelayRange;

pub const DEFAULT_STOP_MULTIPLIER: f64 = 1.30;

/// Process-level options, read once from the environment at startup.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_data_file")]
    pub data_file: String,
    #[serde(default = "default_worker")]
    pub worker_id: usize,
    #[serde(default = "default_worker")]
    pub total_workers: usize,
    #[serde(default, rename = "api_tg")]
    pub telegram_token: Option<String>,
    #[serde(default, rename = "id")]
    pub telegram_chat_id: Option<String>,
    #[serde(default = "default_headless")]
    pub headless: bool,
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_market_listing_url")]
    pub market_listing_url: String,
    #[serde(default = "default_telegram_api_url")]
    pub telegram_api_url: String,
    #[serde(default = "default_stop_multiplier")]
    pub stop_multiplier: f64,
    #[serde(default)]
    pub scan_interval_seconds: Option<u64>,
}

fn default_data_file() -> String {
    "skins_data.json".to_string()
}

fn default_worker() -> usize {
    1
}

fn default_headless() -> bool {
    true
}

fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string()
}

fn default_market_listing_url() -> String {
    "https://steamcommunity.com/market/listings/730/".to_string()
}

fn default_telegram_api_url() -> String {
    "https://api.telegram.org".to_string()
}

fn default_stop_multiplier() -> f64 {
    DEFAULT_STOP_MULTIPLIER
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
            worker_id: default_worker(),
            total_workers: default_worker(),
            telegram_token: None,
            telegram_chat_id: None,
            headless: default_headless(),
            webdriver_url: default_webdriver_url(),
            user_agent: default_user_agent(),
            market_listing_url: default_market_listing_url(),
            telegram_api_url: default_telegram_api_url(),
            stop_multiplier: default_stop_multiplier(),
            scan_interval_seconds: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_environment(::config::Environment::default())
    }

    pub fn from_environment(env: ::config::Environment) -> Result<Self, ConfigError> {
        let config = ::config::Config::builder()
            .add_source(env)
            .build()?
            .try_deserialize::<Config>()?;

        Ok(config)
    }
}

/// Immutable scan parameters shared by the scheduler and every target scan.
#[derive(Debug, Clone)]
pub struct ScanSettings {
    /// Global price ceiling from the data file.
    pub max_price: f64,
    pub stop_multiplier: f64,
    pub market: MarketAddress,
    pub page_delay: DelayRange,
    pub target_delay: DelayRange,
    pub navigation_timeout: Duration,
    pub rows_timeout: Duration,
    pub probe: ProbeSettings,
}

impl ScanSettings {
    pub fn new(config: &Config, max_price: f64) -> Result<Self, ConfigError> {
        if !config.stop_multiplier.is_finite() || config.stop_multiplier <= 0.0 {
            return Err(ConfigError::InvalidStopMultiplier(config.stop_multiplier));
        }

        Ok(Self {
            max_price,
            stop_multiplier: config.stop_multiplier,
            market: MarketAddress::new(&config.market_listing_url)?,
            page_delay: DelayRange::new(Duration::from_secs(20), Duration::from_secs(2)),
            target_delay: DelayRange::new(Duration::from_secs(20), Duration::from_secs(2)),
            navigation_timeout: Duration::from_secs(60),
            rows_timeout: Duration::from_secs(15),
            probe: ProbeSettings::default(),
        })
    }
}

/// Price ceiling and scan targets from the data file.
#[derive(Debug, Clone)]
pub struct TargetFile {
    pub max_price: f64,
    pub targets: Vec<Target>,
}

#[derive(Debug, Deserialize)]
struct RawTargetFile {
    #[serde(default)]
    max_price: Value,
    #[serde(default)]
    targets: Option<Vec<Target>>,
    #[serde(default)]
    skins: Option<Vec<String>>,
    #[serde(default)]
    patterns: HashMap<String, TierSets>,
}

impl TargetFile {
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_string(),
            source,
        })?;
        Self::from_json(path, &content)
    }

    pub fn from_json(path: &str, content: &str) -> Result<Self, ConfigError> {
        let raw: RawTargetFile =
            serde_json::from_str(content).map_err(|source| ConfigError::Parse {
                path: path.to_string(),
                source,
            })?;

        let max_price = read_max_price(&raw.max_price).ok_or_else(|| ConfigError::InvalidMaxPrice {
            path: path.to_string(),
            value: raw.max_price.to_string(),
        })?;

        let targets = match (raw.targets, raw.skins) {
            (Some(targets), _) => targets,
            (None, Some(skins)) => legacy_targets(skins, &raw.patterns),
            (None, None) => {
                return Err(ConfigError::NoTargets {
                    path: path.to_string(),
                })
            }
        };

        let targets = targets
            .into_iter()
            .filter(|target| {
                let keep = !target.listing_name().trim().is_empty();
                if !keep {
                    warn!("Dropping target without a listing name in {}", path);
                }
                keep
            })
            .collect();

        Ok(Self { max_price, targets })
    }
}

fn read_max_price(value: &Value) -> Option<f64> {
    let price = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => parse_number(text),
        _ => None,
    };
    price.filter(|price| price.is_finite())
}

/// Old sheet export: a flat list of market names plus tier sets keyed by base name.
/// Skins without a pattern entry have nothing to look for and are skipped.
fn legacy_targets(skins: Vec<String>, patterns: &HashMap<String, TierSets>) -> Vec<Target> {
    skins
        .into_iter()
        .map(|skin| skin.trim().to_string())
        .filter(|skin| !skin.is_empty())
        .filter_map(|skin| {
            let base = base_skin_name(&skin);
            match patterns.get(&base) {
                Some(tiers) => Some(Target::Tier(TierTarget {
                    listing_name: skin,
                    patterns: tiers.clone(),
                })),
                None => {
                    info!("Skipping {} - no patterns to check", skin);
                    None
                }
            }
        })
        .collect()
}
