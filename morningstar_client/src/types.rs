use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The two kinds of security the site lists.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SecurityKind {
    Stock,
    Fund,
}

impl fmt::Display for SecurityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SecurityKind::Stock => write!(f, "Stock"),
            SecurityKind::Fund => write!(f, "Fund"),
        }
    }
}

/// A search hit: name, detail page, and whatever identifiers the results table shows.
///
/// Stocks carry `ticker` and `currency`, funds carry `isin`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct SearchReference {
    pub name: String,
    /// Fully qualified detail page URL.
    pub url: String,
    pub kind: SecurityKind,
    pub ticker: Option<String>,
    pub currency: Option<String>,
    pub isin: Option<String>,
}

impl SearchReference {
    pub fn stock(name: String, url: String, ticker: String, currency: String) -> Self {
        Self {
            name,
            url,
            kind: SecurityKind::Stock,
            ticker: Some(ticker),
            currency: Some(currency),
            isin: None,
        }
    }

    pub fn fund(name: String, url: String, isin: String) -> Self {
        Self {
            name,
            url,
            kind: SecurityKind::Fund,
            ticker: None,
            currency: None,
            isin: Some(isin),
        }
    }
}

/// Latest valuation of one security, read from its detail page.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ValuationRecord {
    pub title: String,
    pub isin: String,
    /// Date of the valuation as shown on the page.
    pub date: NaiveDate,
    pub value: Decimal,
    /// Currency code, e.g. `GBP`, `USD`, `GBX`.
    pub currency: String,
    /// Percentage change including sign and `%`, verbatim from the page.
    pub change: String,
    pub kind: SecurityKind,
    /// URL the record was scraped from.
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn kind_display_matches_site_labels() {
        assert_eq!(SecurityKind::Stock.to_string(), "Stock");
        assert_eq!(SecurityKind::Fund.to_string(), "Fund");
    }

    #[test]
    fn constructors_fill_kind_specific_identifiers() {
        let stock = SearchReference::stock(
            "Lloyds Banking Group PLC".into(),
            "http://tools.morningstar.co.uk/uk/stockreport/default.aspx?SecurityToken=X".into(),
            "LLOY".into(),
            "GBX".into(),
        );
        assert_eq!(stock.kind, SecurityKind::Stock);
        assert_eq!(stock.ticker.as_deref(), Some("LLOY"));
        assert!(stock.isin.is_none());

        let fund = SearchReference::fund("Fund".into(), "http://x/".into(), "GB00B54RK123".into());
        assert_eq!(fund.kind, SecurityKind::Fund);
        assert_eq!(fund.isin.as_deref(), Some("GB00B54RK123"));
        assert!(fund.ticker.is_none());
        assert!(fund.currency.is_none());
    }

    #[test]
    fn valuation_record_serializes_value_and_date_as_strings() {
        let record = ValuationRecord {
            title: "Vanguard LifeStrategy 60% Equity A Acc".into(),
            isin: "GB00B3TYHH97".into(),
            date: NaiveDate::from_ymd_opt(2016, 10, 28).unwrap(),
            value: Decimal::from_str("156.0400").unwrap(),
            currency: "GBP".into(),
            change: "-0.35%".into(),
            kind: SecurityKind::Fund,
            url: "http://www.morningstar.co.uk/uk/funds/snapshot/snapshot.aspx?id=F1".into(),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["value"], "156.0400");
        assert_eq!(json["date"], "2016-10-28");
        assert_eq!(json["kind"], "Fund");

        let back: ValuationRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }
}
