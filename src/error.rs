use std::time::Duration;
use thiserror::Error;

/// Startup failures. Any of these aborts the run before a single page is loaded.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read environment configuration: {0}")]
    Environment(#[from] ::config::ConfigError),

    #[error("failed to read data file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse data file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("max_price is invalid in {path}: {value}")]
    InvalidMaxPrice { path: String, value: String },

    #[error("data file {path} has neither `targets` nor `skins`")]
    NoTargets { path: String },

    #[error("worker {worker} is outside 1..={total}")]
    InvalidShard { worker: usize, total: usize },

    #[error("invalid market listing url {url}: {source}")]
    InvalidMarketUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("stop multiplier must be a positive number, got {0}")]
    InvalidStopMultiplier(f64),
}

#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("failed to start webdriver session: {0}")]
    Session(#[from] fantoccini::error::NewSessionError),

    #[error("webdriver command failed: {0}")]
    Command(#[from] fantoccini::error::CmdError),

    #[error("navigation to {url} timed out after {timeout:?}")]
    Timeout { url: String, timeout: Duration },

    #[error("no listings rendered on {url}")]
    NoListings { url: String },
}

/// Per-target failures. The scheduler logs these and moves on to the next target.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("page load failed for {url}: {source}")]
    PageLoad {
        url: String,
        #[source]
        source: BrowserError,
    },

    #[error("can't read first listing price on {url}")]
    FirstPriceUnreadable { url: String },

    #[error(transparent)]
    Browser(#[from] BrowserError),
}
