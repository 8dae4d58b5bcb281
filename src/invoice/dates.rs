use chrono::{Duration, NaiveDate};
use std::fmt::Write;

use crate::invoice::model::Invoice;

/// Display format for invoice dates, e.g. "05 Jan 2024"
pub const DATE_FORMAT: &str = "%d %b %Y";

/// Days between the invoice date and a derived due date
pub const DEFAULT_DUE_DAYS: i64 = 30;

const ACCEPTED_FORMATS: [&str; 4] = [DATE_FORMAT, "%d %B %Y", "%Y-%m-%d", "%B %d, %Y"];

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Format `date` with a configured layout. A layout chrono cannot render
/// for a plain date (unknown specifiers, time or offset fields) falls back
/// to [`DATE_FORMAT`].
pub fn format_date_with(date: NaiveDate, layout: &str) -> String {
    let mut out = String::new();
    if write!(out, "{}", date.format(layout)).is_ok() {
        return out;
    }
    log::warn!("date format {layout:?} cannot render a date, using {DATE_FORMAT:?}");
    format_date(date)
}

/// Whether `layout` renders a plain date
pub fn is_date_layout(layout: &str) -> bool {
    let sample = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap_or(NaiveDate::MIN);
    let mut out = String::new();
    write!(out, "{}", sample.format(layout)).is_ok()
}

/// Parse a stored date in any of the accepted layouts
pub fn parse_date(input: &str) -> Option<NaiveDate> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    ACCEPTED_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(input, fmt).ok())
}

/// Invoice date as shown: the stored value, or `today` when it is empty or
/// cannot be read
pub fn effective_invoice_date(invoice: &Invoice, today: NaiveDate) -> NaiveDate {
    match parse_date(&invoice.invoice_date) {
        Some(date) => date,
        None => {
            if !invoice.invoice_date.is_empty() {
                log::warn!(
                    "unreadable invoice date {:?}, using {}",
                    invoice.invoice_date,
                    today
                );
            }
            today
        }
    }
}

/// Due date as shown: the stored value when set, otherwise derived from the
/// current invoice date on every call
pub fn effective_due_date(invoice: &Invoice, today: NaiveDate, due_days: i64) -> NaiveDate {
    if let Some(date) = parse_date(&invoice.invoice_due_date) {
        return date;
    }

    let invoice_date = effective_invoice_date(invoice, today);
    invoice_date
        .checked_add_signed(Duration::days(due_days))
        .unwrap_or(invoice_date)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn formats_day_month_year() {
        assert_eq!(format_date(ymd(2024, 1, 5)), "05 Jan 2024");
    }

    #[test]
    fn bad_layouts_fall_back_to_the_default() {
        let date = ymd(2024, 1, 5);
        assert_eq!(format_date_with(date, "%Y/%m/%d"), "2024/01/05");
        assert_eq!(format_date_with(date, "%Y-%Q"), "05 Jan 2024");
        assert_eq!(format_date_with(date, "%H:%M"), "05 Jan 2024");

        assert!(is_date_layout(DATE_FORMAT));
        assert!(!is_date_layout("%Y-%Q"));
        assert!(!is_date_layout("%d %b %z"));
    }

    #[test]
    fn parses_accepted_layouts() {
        assert_eq!(parse_date("05 Jan 2024"), Some(ymd(2024, 1, 5)));
        assert_eq!(parse_date("05 January 2024"), Some(ymd(2024, 1, 5)));
        assert_eq!(parse_date("2024-01-05"), Some(ymd(2024, 1, 5)));
        assert_eq!(parse_date("January 05, 2024"), Some(ymd(2024, 1, 5)));
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("soon"), None);
    }

    #[test]
    fn due_date_defaults_to_thirty_days_later() {
        let today = ymd(2030, 6, 1);
        let mut invoice = Invoice::default();
        invoice.invoice_date = "2024-01-01".to_string();
        assert_eq!(
            effective_due_date(&invoice, today, DEFAULT_DUE_DAYS),
            ymd(2024, 1, 31)
        );

        // follows later edits of the invoice date
        invoice.invoice_date = "15 Feb 2024".to_string();
        assert_eq!(
            effective_due_date(&invoice, today, DEFAULT_DUE_DAYS),
            ymd(2024, 3, 16)
        );
    }

    #[test]
    fn explicit_due_date_wins() {
        let mut invoice = Invoice::default();
        invoice.invoice_date = "2024-01-01".to_string();
        invoice.invoice_due_date = "2024-01-10".to_string();
        assert_eq!(
            effective_due_date(&invoice, ymd(2030, 1, 1), DEFAULT_DUE_DAYS),
            ymd(2024, 1, 10)
        );
    }

    #[test]
    fn empty_or_bad_invoice_date_uses_today() {
        let today = ymd(2024, 3, 1);
        let mut invoice = Invoice::default();
        assert_eq!(effective_invoice_date(&invoice, today), today);
        invoice.invoice_date = "someday".to_string();
        assert_eq!(effective_invoice_date(&invoice, today), today);
        assert_eq!(
            effective_due_date(&invoice, today, DEFAULT_DUE_DAYS),
            ymd(2024, 3, 31)
        );
    }
}
