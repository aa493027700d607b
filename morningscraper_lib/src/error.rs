//! Error types for the library layer.

use thiserror::Error;

/// Hard failures that abort a whole query.
///
/// Host and URL-shape violations and a malformed search page land here.
/// Problems with an individual detail page never do: those are reported
/// as a [`DetailError`] and the reference is dropped.
#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("client error: {0}")]
    Client(#[from] morningstar_client::Error),
    #[error("search page parse error: {0}")]
    SearchParse(String),
}

/// Why a detail page produced no record.
#[derive(Error, Debug)]
pub enum DetailError {
    #[error("failed to fetch detail page: {0}")]
    Fetch(#[from] morningstar_client::Error),
    #[error("missing element {0}")]
    MissingElement(&'static str),
    #[error("key statistics incomplete, missing {missing:?}")]
    IncompleteKeyStats { missing: Vec<&'static str> },
    #[error("malformed {field} text {text:?}")]
    MalformedText { field: &'static str, text: String },
    #[error("invalid date {0:?}")]
    InvalidDate(String),
    #[error("invalid value {0:?}")]
    InvalidValue(String),
}
