use chrono::{DateTime, NaiveDate};

/// Shown in place of a missing or unparseable invoice date.
pub const DATE_PLACEHOLDER: &str = "N/A";

/// Parses the invoice date as entered.
///
/// Accepts `YYYY-MM-DD` (what a date input produces) and RFC 3339
/// timestamps. For timestamps the calendar date in the timestamp's own
/// offset is used, so no day shift happens.
pub fn parse_invoice_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(trimmed)
                .ok()
                .map(|dt| dt.date_naive())
        })
}

/// Formats the date as "March 05, 2024", or `placeholder` when it cannot
/// be parsed.
pub fn format_invoice_date(raw: &str, placeholder: &str) -> String {
    match parse_invoice_date(raw) {
        Some(date) => date.format("%B %d, %Y").to_string(),
        None => placeholder.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_formats_iso_date() {
        assert_eq!(format_invoice_date("2024-03-05", DATE_PLACEHOLDER), "March 05, 2024");
        assert_eq!(format_invoice_date(" 2023-12-31 ", DATE_PLACEHOLDER), "December 31, 2023");
    }

    #[test]
    fn test_formats_rfc3339_without_day_shift() {
        assert_eq!(
            format_invoice_date("2024-03-05T23:30:00+08:00", DATE_PLACEHOLDER),
            "March 05, 2024"
        );
    }

    #[test]
    fn test_missing_or_invalid_date_uses_placeholder() {
        for raw in ["", "   ", "yesterday", "2024-13-01", "2024-02-30"] {
            assert_eq!(format_invoice_date(raw, DATE_PLACEHOLDER), "N/A", "input {:?}", raw);
        }
        assert_eq!(format_invoice_date("", ""), "");
    }
}
