use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use url::Url;

use crate::error::ConfigError;

/// Listings per page. The market ignores larger `count` values for anonymous sessions.
pub const PAGE_SIZE: usize = 10;

/// Characters left alone by JavaScript's `encodeURIComponent`.
const NAME_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Builds listing page addresses under a fixed base path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketAddress {
    base: Url,
}

impl MarketAddress {
    pub fn new(base: &str) -> Result<Self, ConfigError> {
        let normalized = format!("{}/", base.trim().trim_end_matches('/'));
        let base = Url::parse(&normalized).map_err(|source| ConfigError::InvalidMarketUrl {
            url: base.to_string(),
            source,
        })?;
        Ok(Self { base })
    }

    /// First page of a listing, without paging parameters.
    pub fn listing_url(&self, listing_name: &str) -> Url {
        let encoded = utf8_percent_encode(listing_name, NAME_ENCODE_SET).to_string();
        let mut url = self.base.clone();
        url.set_path(&format!("{}{}", self.base.path(), encoded));
        url
    }

    /// Page `page_index` (0-based) of a listing.
    pub fn page_url(&self, listing_name: &str, page_index: usize) -> Url {
        let mut url = self.listing_url(listing_name);
        if page_index > 0 {
            url.query_pairs_mut()
                .append_pair("start", &(page_index * PAGE_SIZE).to_string())
                .append_pair("count", &PAGE_SIZE.to_string());
        }
        url
    }
}
