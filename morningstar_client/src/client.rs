//! HTTP client for fetching rendered pages from the site.

use std::time::Duration;

use crate::{Error, Site};

/// Fetches HTML pages from a single [`Site`].
///
/// Requests go out one at a time with transport defaults: no custom headers,
/// no cookies, no retries. No timeout is set unless the caller asks for one.
pub struct Client {
    site: Site,
    http: reqwest::Client,
}

impl Client {
    /// Creates a client for the production site.
    pub fn new() -> Result<Self, Error> {
        Self::with_site(Site::default())
    }

    /// Creates a client for an arbitrary site configuration.
    pub fn with_site(site: Site) -> Result<Self, Error> {
        let http = reqwest::Client::builder().build().map_err(|e| {
            tracing::error!("Failed to build HTTP client: {}", e);
            Error::Http(e)
        })?;
        Ok(Self { site, http })
    }

    /// Creates a client whose site is rooted at `base_url`. Used for testing with wiremock.
    pub fn with_base_url(base_url: &str) -> Result<Self, Error> {
        Self::with_site(Site::from_base_url(base_url)?)
    }

    /// Rebuilds the transport with a per-request timeout.
    pub fn with_timeout(self, timeout: Duration) -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                tracing::error!("Failed to build HTTP client: {}", e);
                Error::Http(e)
            })?;
        Ok(Self {
            site: self.site,
            http,
        })
    }

    pub fn site(&self) -> &Site {
        &self.site
    }

    /// URL of the search results page for `query`.
    pub fn search_url(&self, query: &str) -> String {
        self.site.search_url(query)
    }

    /// Fails with [`Error::ForeignHost`] unless `url` belongs to the configured site.
    pub fn assert_same_site(&self, url: &str) -> Result<(), Error> {
        self.site.assert_same_site(url)
    }

    /// Issues a single GET and returns the response body as text.
    ///
    /// Callers fetching a URL discovered on a page must run
    /// [`Client::assert_same_site`] first.
    pub async fn fetch(&self, url: &str) -> Result<String, Error> {
        tracing::debug!("GET {}", url);
        let resp = self.http.get(url).send().await.map_err(|e| {
            tracing::error!("Failed to get resource: {}", e);
            Error::Http(e)
        })?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| {
            tracing::error!("Failed to read response body: {}", e);
            Error::Http(e)
        })?;

        if !status.is_success() {
            let snippet = truncate_body(&body);
            tracing::error!("Request failed with status {}: {}", status, snippet);
            return Err(Error::HttpStatus {
                status: status.as_u16(),
                body: snippet,
            });
        }

        Ok(body)
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 2000;
    if body.len() <= MAX {
        return body.to_string();
    }
    let mut end = MAX;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...[truncated]", &body[..end])
}
