//! Small helpers for turning scraped element text into typed values.

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use scraper::ElementRef;

use crate::DetailError;

/// All descendant text of an element, concatenated.
pub(crate) fn element_text(element: &ElementRef<'_>) -> String {
    element.text().collect()
}

/// Parses a `dd/mm/yyyy` date.
pub(crate) fn parse_dmy(raw: &str) -> Result<NaiveDate, DetailError> {
    NaiveDate::parse_from_str(raw.trim(), "%d/%m/%Y")
        .map_err(|_| DetailError::InvalidDate(raw.to_string()))
}

/// Parses a plain decimal number such as `156.0400`.
pub(crate) fn parse_decimal(raw: &str) -> Result<Decimal, DetailError> {
    Decimal::from_str(raw.trim()).map_err(|_| DetailError::InvalidValue(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_dmy_reads_day_first() {
        assert_eq!(
            parse_dmy("28/10/2016").unwrap(),
            NaiveDate::from_ymd_opt(2016, 10, 28).unwrap()
        );
        assert_eq!(
            parse_dmy(" 07/03/2016\n").unwrap(),
            NaiveDate::from_ymd_opt(2016, 3, 7).unwrap()
        );
    }

    #[test]
    fn parse_dmy_rejects_other_formats() {
        assert!(matches!(parse_dmy("2016-10-28"), Err(DetailError::InvalidDate(_))));
        assert!(matches!(parse_dmy("10/28/2016"), Err(DetailError::InvalidDate(_))));
        assert!(matches!(parse_dmy(""), Err(DetailError::InvalidDate(_))));
    }

    #[test]
    fn parse_decimal_keeps_scale() {
        let value = parse_decimal(" 156.0400 ").unwrap();
        assert_eq!(value.to_string(), "156.0400");
        assert_eq!(parse_decimal("-3").unwrap(), Decimal::from(-3));
    }

    #[test]
    fn parse_decimal_rejects_non_numbers() {
        assert!(matches!(parse_decimal("1,234.5"), Err(DetailError::InvalidValue(_))));
        assert!(matches!(parse_decimal("GBP"), Err(DetailError::InvalidValue(_))));
        assert!(matches!(parse_decimal(""), Err(DetailError::InvalidValue(_))));
    }
}
