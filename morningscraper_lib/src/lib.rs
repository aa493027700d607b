//! Library layer for Morningscraper: search result and detail page parsing
//! plus the search-then-detail pipeline.
//!
//! Wraps the `morningstar_client` crate, which owns the site configuration,
//! URL building and page fetching.

pub mod detail;
pub mod error;
pub mod scrape;
pub mod search;
mod text;

pub use morningstar_client;
pub use morningstar_client::types;
pub use morningstar_client::{Client, Site};

pub use detail::{parse_fund_page, parse_stock_page, PageKind};
pub use error::{DetailError, ScrapeError};
pub use scrape::{DetailOutcome, DetailReport, ScrapeClient};
pub use search::parse_search_results;
