//! Site configuration: origin, domain, and the URL shapes the scraper understands.

use url::Url;

use crate::Error;

/// Path of the security search results page. The search term goes in the `search` parameter.
pub const SEARCH_PATH: &str = "/uk/funds/SecuritySearchResults.aspx";

/// Marker identifying a fund snapshot page,
/// e.g. `/uk/funds/snapshot/snapshot.aspx?id=F00000NGEH`.
pub const FUND_SNAPSHOT_PATH: &str = "/uk/funds/snapshot/snapshot";

/// Marker identifying a stock report page,
/// e.g. `/uk/stockreport/default.aspx?SecurityToken=0P000090RG]3]0]E0WWE$$ALL`.
pub const STOCK_REPORT_PATH: &str = "/uk/stockreport/";

const DEFAULT_DOMAIN: &str = "morningstar.co.uk";
const DEFAULT_BASE_URL: &str = "http://www.morningstar.co.uk";

/// Immutable description of the site being scraped.
///
/// Every URL the pipeline builds starts at `base_url`, and every URL it is
/// about to fetch must have a host inside `domain`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Site {
    domain: String,
    base_url: String,
}

impl Default for Site {
    fn default() -> Self {
        Self {
            domain: DEFAULT_DOMAIN.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl Site {
    /// Creates a site from an explicit domain and base origin.
    pub fn new(domain: &str, base_url: &str) -> Self {
        Self {
            domain: domain.to_ascii_lowercase(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Creates a site whose domain is the host of `base_url`. Used for testing with wiremock.
    pub fn from_base_url(base_url: &str) -> Result<Self, Error> {
        let parsed = Url::parse(base_url).map_err(|e| {
            tracing::error!("Invalid base URL {}: {}", base_url, e);
            Error::InvalidUrl {
                url: base_url.to_string(),
            }
        })?;
        let host = parsed.host_str().ok_or_else(|| Error::InvalidUrl {
            url: base_url.to_string(),
        })?;
        Ok(Self::new(host, base_url))
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Builds the search results URL for a free-text, ticker or ISIN query.
    ///
    /// The query is percent-encoded and otherwise taken as is; an empty query
    /// is a valid search that simply finds nothing.
    pub fn search_url(&self, query: &str) -> String {
        format!(
            "{}{}?search={}",
            self.base_url,
            SEARCH_PATH,
            urlencoding::encode(query)
        )
    }

    /// Fully qualifies a site-relative URL (`/path`); anything else is returned unchanged.
    pub fn absolutize(&self, url: &str) -> String {
        if url.starts_with('/') && !url.starts_with("//") {
            format!("{}{}", self.base_url, url)
        } else {
            url.to_string()
        }
    }

    /// Returns `true` when the URL's host is the site domain or one of its subdomains.
    pub fn owns(&self, url: &str) -> bool {
        let Ok(parsed) = Url::parse(url) else {
            return false;
        };
        let Some(host) = parsed.host_str() else {
            return false;
        };
        let host = host.to_ascii_lowercase();
        match host.strip_suffix(self.domain.as_str()) {
            Some("") => true,
            Some(prefix) => prefix.ends_with('.'),
            None => false,
        }
    }

    /// Fails with [`Error::ForeignHost`] unless the URL belongs to this site.
    pub fn assert_same_site(&self, url: &str) -> Result<(), Error> {
        if self.owns(url) {
            Ok(())
        } else {
            tracing::error!("Refusing to follow foreign URL {}", url);
            Err(Error::ForeignHost {
                url: url.to_string(),
            })
        }
    }
}
