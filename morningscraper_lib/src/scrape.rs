//! Search-then-detail pipeline over a [`Client`].

use morningstar_client::types::{SearchReference, ValuationRecord};
use morningstar_client::Client;

use crate::detail::PageKind;
use crate::search::parse_search_results;
use crate::{DetailError, ScrapeError};

/// Outcome of scraping one detail page.
pub type DetailOutcome = Result<ValuationRecord, DetailError>;

/// A search hit paired with what its detail page yielded.
#[derive(Debug)]
pub struct DetailReport {
    pub reference: SearchReference,
    pub outcome: DetailOutcome,
}

/// Resolves search terms to securities and scrapes their valuations.
///
/// Requests are strictly sequential: the search page first, then one detail
/// page at a time in result order.
pub struct ScrapeClient {
    client: Client,
    verbose: bool,
}

impl ScrapeClient {
    /// Creates a scraper for the production site.
    pub fn new() -> Result<Self, ScrapeError> {
        Ok(Self::with_client(Client::new()?))
    }

    /// Creates a scraper rooted at `base_url`. Used for testing with wiremock.
    pub fn with_base_url(base_url: &str) -> Result<Self, ScrapeError> {
        Ok(Self::with_client(Client::with_base_url(base_url)?))
    }

    pub fn with_client(client: Client) -> Self {
        Self {
            client,
            verbose: false,
        }
    }

    /// Reports progress at `info` instead of `debug`.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    fn progress(&self, line: &str) {
        if self.verbose {
            tracing::info!("{}", line);
        } else {
            tracing::debug!("{}", line);
        }
    }

    /// Searches the site for a free-text term, ticker or ISIN.
    ///
    /// Any failure here, including a results row that cannot be parsed,
    /// fails the whole query.
    pub async fn search(&self, query: &str) -> Result<Vec<SearchReference>, ScrapeError> {
        self.progress(&format!("Search for: {}", query));
        let html = self.client.fetch(&self.client.search_url(query)).await?;
        let results = parse_search_results(&html, self.client.site())?;

        if results.is_empty() {
            self.progress("No items found.");
        } else {
            self.progress(&format!("{} item(s) found.", results.len()));
            for item in &results {
                self.progress(&format!("\t{}\t{}", item.kind, item.name));
            }
        }
        Ok(results)
    }

    /// Scrapes one detail page, reporting why it produced no record.
    ///
    /// The outer error is reserved for URLs that must never be followed: a
    /// foreign host or an unrecognised page shape. Everything that goes wrong
    /// after that, the fetch included, lands in the inner [`DetailError`].
    pub async fn get_details(&self, url: &str) -> Result<DetailOutcome, ScrapeError> {
        self.progress(&format!("Opening {}", url));
        self.client.assert_same_site(url)?;
        let kind = PageKind::from_url(url)?;

        let outcome = match self.client.fetch(url).await {
            Ok(html) => kind.parse(&html, url),
            Err(e) => Err(DetailError::from(e)),
        };

        match &outcome {
            Ok(record) => self.progress(&format!("{:?}", record)),
            Err(e) => {
                tracing::warn!("No data from {}: {}", url, e);
                self.progress("None");
            }
        }
        Ok(outcome)
    }

    /// Scrapes one detail page, collapsing any extraction failure to `None`.
    pub async fn get_url(&self, url: &str) -> Result<Option<ValuationRecord>, ScrapeError> {
        Ok(self.get_details(url).await?.ok())
    }

    /// Searches for `query` and scrapes every hit, keeping only the pages that parsed.
    ///
    /// Order follows the search results. Hits whose detail page failed are
    /// silently dropped; use [`ScrapeClient::get_data_report`] to see why.
    pub async fn get_data(&self, query: &str) -> Result<Vec<ValuationRecord>, ScrapeError> {
        let results = self.search(query).await?;
        let mut output = Vec::with_capacity(results.len());
        for item in &results {
            if let Some(record) = self.get_url(&item.url).await? {
                output.push(record);
            }
        }
        Ok(output)
    }

    /// Searches for `query` and scrapes every hit, keeping each outcome.
    pub async fn get_data_report(&self, query: &str) -> Result<Vec<DetailReport>, ScrapeError> {
        let results = self.search(query).await?;
        let mut reports = Vec::with_capacity(results.len());
        for reference in results {
            let outcome = self.get_details(&reference.url).await?;
            reports.push(DetailReport { reference, outcome });
        }
        Ok(reports)
    }
}
