//! Error types for the site client.

/// Errors that can occur when building URLs for, or fetching pages from, the site.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The URL does not belong to the configured site. Never suppressed.
    #[error("URL {url:?} is not on the expected site")]
    ForeignHost { url: String },
    /// A detail URL matches neither the fund snapshot nor the stock report layout.
    #[error("unrecognised URL {url:?}")]
    UnrecognizedUrl { url: String },
    /// A base URL could not be parsed or carries no host.
    #[error("invalid URL {url:?}")]
    InvalidUrl { url: String },
    /// The HTTP request itself failed (connect, timeout, body read).
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    /// The site returned a non-success status with a body snippet.
    #[error("Request failed with status {status}")]
    HttpStatus { status: u16, body: String },
}
