//! Parser for the security search results page.

use morningstar_client::types::SearchReference;
use morningstar_client::Site;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

use crate::text::element_text;
use crate::ScrapeError;

static STOCK_TABLE: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("table#ctl00_MainContent_stockTable").expect("stock table selector")
});
static FUND_TABLE: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("table#ctl00_MainContent_fundTable").expect("fund table selector")
});
static ROW: Lazy<Selector> = Lazy::new(|| Selector::parse("tr").expect("row selector"));
static CELL: Lazy<Selector> = Lazy::new(|| Selector::parse("td").expect("cell selector"));
static LINK: Lazy<Selector> = Lazy::new(|| Selector::parse("a").expect("link selector"));
static TICKER_CELL: Lazy<Selector> =
    Lazy::new(|| Selector::parse("td.searchTicker").expect("ticker selector"));
static CURRENCY_CELL: Lazy<Selector> =
    Lazy::new(|| Selector::parse("td.searchCurrency").expect("currency selector"));

/// Extracts stock and fund references from a search results page.
///
/// Stocks come first, in page order, followed by funds. A page with neither
/// results table yields an empty list. A results row missing its link,
/// ticker, currency or ISIN cell fails the whole page.
pub fn parse_search_results(html: &str, site: &Site) -> Result<Vec<SearchReference>, ScrapeError> {
    let document = Html::parse_document(html);
    let mut results = Vec::new();

    if let Some(table) = document.select(&STOCK_TABLE).next() {
        for (i, row) in table.select(&ROW).skip(1).enumerate() {
            results.push(parse_stock_row(&row, site).map_err(|e| {
                ScrapeError::SearchParse(format!("stock row {}: {}", i + 1, e))
            })?);
        }
    }

    if let Some(table) = document.select(&FUND_TABLE).next() {
        for (i, row) in table.select(&ROW).skip(1).enumerate() {
            results.push(parse_fund_row(&row, site).map_err(|e| {
                ScrapeError::SearchParse(format!("fund row {}: {}", i + 1, e))
            })?);
        }
    }

    Ok(results)
}

fn parse_stock_row(row: &ElementRef<'_>, site: &Site) -> Result<SearchReference, &'static str> {
    let first = row.select(&CELL).next().ok_or("no cells")?;
    let (name, url) = name_and_link(&first, site)?;
    let ticker = row
        .select(&TICKER_CELL)
        .next()
        .map(|td| element_text(&td).trim().to_string())
        .ok_or("no ticker cell")?;
    let currency = row
        .select(&CURRENCY_CELL)
        .next()
        .map(|td| element_text(&td).trim().to_string())
        .ok_or("no currency cell")?;
    Ok(SearchReference::stock(name, url, ticker, currency))
}

fn parse_fund_row(row: &ElementRef<'_>, site: &Site) -> Result<SearchReference, &'static str> {
    let mut cells = row.select(&CELL);
    let first = cells.next().ok_or("no cells")?;
    let (name, url) = name_and_link(&first, site)?;
    let isin = cells
        .next()
        .map(|td| element_text(&td).trim().to_string())
        .ok_or("no ISIN cell")?;
    Ok(SearchReference::fund(name, url, isin))
}

fn name_and_link(cell: &ElementRef<'_>, site: &Site) -> Result<(String, String), &'static str> {
    let href = cell
        .select(&LINK)
        .next()
        .ok_or("no link in first cell")?
        .value()
        .attr("href")
        .ok_or("link has no href")?;
    Ok((element_text(cell).trim().to_string(), site.absolutize(href)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use morningstar_client::types::SecurityKind;

    const BOTH_TABLES: &str = r#"
<html><body>
<table id="ctl00_MainContent_stockTable">
  <tr><th>Name</th><th>Ticker</th><th>Exchange</th><th>Currency</th></tr>
  <tr>
    <td><a href="http://tools.morningstar.co.uk/uk/stockreport/default.aspx?SecurityToken=0P000090RG]3]0]E0WWE$$ALL">Lloyds Banking Group PLC</a></td>
    <td class="searchTicker">LLOY</td>
    <td class="searchExchange">LSE</td>
    <td class="searchCurrency">GBX</td>
  </tr>
</table>
<table id="ctl00_MainContent_fundTable">
  <tr><th>Name</th><th>ISIN</th></tr>
  <tr>
    <td><a href="/uk/funds/snapshot/snapshot.aspx?id=F00000NGEH">Vanguard LifeStrategy 60% Equity A Acc</a></td>
    <td>GB00B3TYHH97</td>
  </tr>
</table>
</body></html>"#;

    #[test]
    fn parses_stock_then_fund() {
        let site = Site::default();
        let refs = parse_search_results(BOTH_TABLES, &site).unwrap();
        assert_eq!(refs.len(), 2);

        assert_eq!(refs[0].kind, SecurityKind::Stock);
        assert_eq!(refs[0].name, "Lloyds Banking Group PLC");
        assert_eq!(
            refs[0].url,
            "http://tools.morningstar.co.uk/uk/stockreport/default.aspx?SecurityToken=0P000090RG]3]0]E0WWE$$ALL"
        );
        assert_eq!(refs[0].ticker.as_deref(), Some("LLOY"));
        assert_eq!(refs[0].currency.as_deref(), Some("GBX"));
        assert_eq!(refs[0].isin, None);

        assert_eq!(refs[1].kind, SecurityKind::Fund);
        assert_eq!(refs[1].name, "Vanguard LifeStrategy 60% Equity A Acc");
        assert_eq!(
            refs[1].url,
            "http://www.morningstar.co.uk/uk/funds/snapshot/snapshot.aspx?id=F00000NGEH"
        );
        assert_eq!(refs[1].isin.as_deref(), Some("GB00B3TYHH97"));
        assert_eq!(refs[1].ticker, None);
    }

    #[test]
    fn no_tables_is_empty_not_error() {
        let site = Site::default();
        let refs = parse_search_results("<html><body><p>No results</p></body></html>", &site)
            .unwrap();
        assert!(refs.is_empty());
    }

    #[test]
    fn header_only_table_yields_nothing() {
        let html = r#"<table id="ctl00_MainContent_fundTable"><tr><th>Name</th><th>ISIN</th></tr></table>"#;
        assert!(parse_search_results(html, &Site::default()).unwrap().is_empty());
    }

    #[test]
    fn duplicates_are_preserved() {
        let html = r#"
<table id="ctl00_MainContent_fundTable">
  <tr><th>Name</th><th>ISIN</th></tr>
  <tr><td><a href="/uk/funds/snapshot/snapshot.aspx?id=F1">Same</a></td><td>GB0000000001</td></tr>
  <tr><td><a href="/uk/funds/snapshot/snapshot.aspx?id=F1">Same</a></td><td>GB0000000001</td></tr>
</table>"#;
        let refs = parse_search_results(html, &Site::default()).unwrap();
        assert_eq!(refs.len(), 2);
        assert_eq!(refs[0], refs[1]);
    }

    #[test]
    fn stock_row_without_ticker_fails_the_page() {
        let html = r#"
<table id="ctl00_MainContent_stockTable">
  <tr><th>Name</th></tr>
  <tr><td><a href="/uk/stockreport/default.aspx?SecurityToken=X">Acme</a></td><td class="searchCurrency">GBX</td></tr>
</table>"#;
        let err = parse_search_results(html, &Site::default()).unwrap_err();
        assert!(matches!(err, ScrapeError::SearchParse(msg) if msg.contains("ticker")));
    }

    #[test]
    fn fund_row_without_link_fails_the_page() {
        let html = r#"
<table id="ctl00_MainContent_fundTable">
  <tr><th>Name</th><th>ISIN</th></tr>
  <tr><td>Unlinked Fund</td><td>GB0000000001</td></tr>
</table>"#;
        assert!(matches!(
            parse_search_results(html, &Site::default()),
            Err(ScrapeError::SearchParse(_))
        ));
    }
}
