mod client;
mod errors;
mod site;
pub mod types;
pub use self::client::Client;
pub use self::errors::Error;
pub use self::site::{Site, FUND_SNAPSHOT_PATH, SEARCH_PATH, STOCK_REPORT_PATH};
