//! Extractors for the two detail page layouts: fund snapshot and stock report.

use morningstar_client::types::{SecurityKind, ValuationRecord};
use morningstar_client::{Error, FUND_SNAPSHOT_PATH, STOCK_REPORT_PATH};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};

use crate::text::{element_text, parse_decimal, parse_dmy};
use crate::DetailError;

/// Which extractor a detail URL is routed to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageKind {
    FundSnapshot,
    StockReport,
}

impl PageKind {
    /// Routes a detail URL by its path shape.
    pub fn from_url(url: &str) -> Result<Self, Error> {
        if url.contains(FUND_SNAPSHOT_PATH) {
            Ok(PageKind::FundSnapshot)
        } else if url.contains(STOCK_REPORT_PATH) {
            Ok(PageKind::StockReport)
        } else {
            Err(Error::UnrecognizedUrl {
                url: url.to_string(),
            })
        }
    }

    /// Runs the matching extractor over a fetched page.
    pub fn parse(self, html: &str, url: &str) -> Result<ValuationRecord, DetailError> {
        match self {
            PageKind::FundSnapshot => parse_fund_page(html, url),
            PageKind::StockReport => parse_stock_page(html, url),
        }
    }
}

macro_rules! selector {
    ($name:ident, $css:literal) => {
        static $name: Lazy<Selector> =
            Lazy::new(|| Selector::parse($css).expect(concat!("selector ", $css)));
    };
}

selector!(FUND_TITLE, "div.snapshotTitleBox h1");
selector!(KEY_STATS_TABLE, "table.overviewKeyStatsTable");
selector!(ROW, "tr");
selector!(CELL, "td");
selector!(SPAN, "span");

selector!(STOCK_TITLE, "span.securityName");
selector!(STOCK_PRICE, "span#Col0Price");
selector!(STOCK_PRICE_DETAIL, "span#Col0PriceDetail");
selector!(STOCK_PRICE_TIME, "p#Col0PriceTime");
selector!(STOCK_ISIN, "td#Col0Isin");

static PRICE_TIME_CURRENCY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\|\s([A-Z]{3,4})\b").expect("currency regex"));

/// Parses a fund snapshot page.
///
/// The key statistics table must hold a `NAV` row (date in a span of the
/// label cell, `CUR value` in the third cell), a `Day Change` row and an
/// `ISIN` row. Only rows with exactly three cells are considered; when a
/// label repeats, the last row wins.
pub fn parse_fund_page(html: &str, url: &str) -> Result<ValuationRecord, DetailError> {
    let document = Html::parse_document(html);
    let title = document
        .select(&FUND_TITLE)
        .next()
        .map(|h1| element_text(&h1).trim().to_string())
        .ok_or(DetailError::MissingElement("snapshot title"))?;
    let table = document
        .select(&KEY_STATS_TABLE)
        .next()
        .ok_or(DetailError::MissingElement("key statistics table"))?;

    let mut nav: Option<(String, String, String)> = None;
    let mut change = None;
    let mut isin = None;

    for tr in table.select(&ROW) {
        let tds: Vec<_> = tr.select(&CELL).collect();
        if tds.len() != 3 {
            continue;
        }
        let label = element_text(&tds[0]);
        if label.starts_with("NAV") {
            let date = tds[0]
                .select(&SPAN)
                .next()
                .map(|span| element_text(&span))
                .ok_or(DetailError::MissingElement("NAV date"))?;
            let amount = element_text(&tds[2]);
            let parts: Vec<&str> = amount.split_whitespace().collect();
            let [currency, value] = parts.as_slice() else {
                return Err(DetailError::MalformedText {
                    field: "NAV",
                    text: amount.clone(),
                });
            };
            nav = Some((date, currency.to_string(), value.to_string()));
        } else if label.starts_with("Day Change") {
            change = Some(element_text(&tds[2]).trim().to_string());
        } else if label.starts_with("ISIN") {
            isin = Some(element_text(&tds[2]).trim().to_string());
        }
    }

    let ((date, currency, value), change, isin) = match (nav, change, isin) {
        (Some(nav), Some(change), Some(isin)) => (nav, change, isin),
        (nav, change, isin) => {
            let missing = [
                ("NAV", nav.is_none()),
                ("Day Change", change.is_none()),
                ("ISIN", isin.is_none()),
            ]
            .into_iter()
            .filter_map(|(label, absent)| absent.then_some(label))
            .collect();
            return Err(DetailError::IncompleteKeyStats { missing });
        }
    };

    Ok(ValuationRecord {
        title,
        isin,
        date: parse_dmy(&date)?,
        value: parse_decimal(&value)?,
        currency,
        change,
        kind: SecurityKind::Fund,
        url: url.to_string(),
    })
}

fn first_text(
    document: &Html,
    selector: &Selector,
    what: &'static str,
) -> Result<String, DetailError> {
    document
        .select(selector)
        .next()
        .map(|el| element_text(&el))
        .ok_or(DetailError::MissingElement(what))
}

/// Parses a stock report page.
///
/// The price time paragraph reads like `Price 28/10/2016 16:35:06 | GBX`: the
/// date is the ten characters after the six-character prefix and the currency
/// is the code following the bar.
pub fn parse_stock_page(html: &str, url: &str) -> Result<ValuationRecord, DetailError> {
    let document = Html::parse_document(html);
    let title = first_text(&document, &STOCK_TITLE, "security name")?
        .trim()
        .to_string();
    let price = first_text(&document, &STOCK_PRICE, "price")?;
    let detail = first_text(&document, &STOCK_PRICE_DETAIL, "price detail")?;
    let change = detail
        .split('|')
        .nth(1)
        .map(|s| s.trim().to_string())
        .ok_or_else(|| DetailError::MalformedText {
            field: "price detail",
            text: detail.clone(),
        })?;
    let price_time = first_text(&document, &STOCK_PRICE_TIME, "price time")?;
    let date: String = price_time.chars().skip(6).take(10).collect();
    let currency = PRICE_TIME_CURRENCY
        .captures(&price_time)
        .map(|cap| cap[1].to_string())
        .ok_or_else(|| DetailError::MalformedText {
            field: "price time",
            text: price_time.clone(),
        })?;
    let isin = first_text(&document, &STOCK_ISIN, "ISIN")?.trim().to_string();

    Ok(ValuationRecord {
        title,
        isin,
        date: parse_dmy(&date)?,
        value: parse_decimal(&price)?,
        currency,
        change,
        kind: SecurityKind::Stock,
        url: url.to_string(),
    })
}
