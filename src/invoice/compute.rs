use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

use crate::invoice::model::{Invoice, ProductLine};
use crate::invoice::words::{digits_to_words, to_words};

static DECIMAL_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?").expect("valid decimal pattern")
});

static TAX_PERCENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9]+)%").expect("valid percent pattern"));

/// Parse the leading decimal number of `input`, ignoring whatever follows.
/// Input without a numeric prefix parses as 0.
pub fn parse_decimal(input: &str) -> f64 {
    DECIMAL_PREFIX
        .find(input.trim_start())
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .unwrap_or(0.0)
}

/// Round half up (toward positive infinity)
pub fn round_half_up(value: f64) -> f64 {
    let floor = value.floor();
    let rounded = if value - floor >= 0.5 { floor + 1.0 } else { floor };
    // no "-0"
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Unrounded `quantity * rate`; zero when either side is zero or unparseable
pub fn line_product(quantity: &str, rate: &str) -> f64 {
    let quantity = parse_decimal(quantity);
    let rate = parse_decimal(rate);
    if quantity == 0.0 || rate == 0.0 {
        return 0.0;
    }

    let product = quantity * rate;
    if product.is_finite() {
        product
    } else {
        0.0
    }
}

/// Amount column of a line: the rounded product as a whole-number string
pub fn amount(quantity: &str, rate: &str) -> String {
    format!("{:.0}", round_half_up(line_product(quantity, rate)))
}

/// Sum of the raw line products. Rounding is left to the caller so the
/// total is `round(sum)`, not the sum of rounded amounts.
pub fn sub_total(lines: &[ProductLine]) -> f64 {
    let sum: f64 = lines
        .iter()
        .map(|line| line_product(&line.quantity, &line.rate))
        .sum();
    if sum.is_finite() {
        sum
    } else {
        0.0
    }
}

/// Percentage embedded in a tax label, e.g. "Sale Tax (10%)" -> 10
pub fn tax_rate(label: &str) -> f64 {
    TAX_PERCENT
        .captures(label)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .unwrap_or(0.0)
}

pub fn sale_tax(sub_total: f64, tax_label: &str) -> f64 {
    if sub_total == 0.0 {
        return 0.0;
    }
    let tax = sub_total * tax_rate(tax_label) / 100.0;
    if tax.is_finite() {
        tax
    } else {
        0.0
    }
}

/// Words for a monetary amount. Rounds half up and clamps negatives and
/// NaN to zero before converting. The words are spelled from the same
/// digits the amount prints with, however large.
pub fn words_for_amount(value: f64) -> String {
    let rounded = round_half_up(value);
    if !rounded.is_finite() || rounded <= 0.0 {
        return to_words(0);
    }
    digits_to_words(&format!("{:.0}", rounded))
}

/// Derived values of an invoice, recomputed from scratch on every call
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct Totals {
    pub sub_total: f64,
    pub tax_rate: f64,
    pub sale_tax: f64,
    /// `round(sub_total)`; the sale tax is reported but not added
    pub total: f64,
    pub total_in_words: String,
}

impl Totals {
    pub fn compute(invoice: &Invoice) -> Self {
        let sub_total = sub_total(&invoice.product_lines);
        Self {
            sub_total,
            tax_rate: tax_rate(&invoice.tax_label),
            sale_tax: sale_tax(sub_total, &invoice.tax_label),
            total: round_half_up(sub_total),
            total_in_words: words_for_amount(sub_total),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_decimal_takes_numeric_prefix() {
        assert_eq!(parse_decimal("2"), 2.0);
        assert_eq!(parse_decimal("  12abc"), 12.0);
        assert_eq!(parse_decimal("2."), 2.0);
        assert_eq!(parse_decimal(".5"), 0.5);
        assert_eq!(parse_decimal("-3.25"), -3.25);
        assert_eq!(parse_decimal("1e3"), 1000.0);
        assert_eq!(parse_decimal("1e"), 1.0);
        assert_eq!(parse_decimal(""), 0.0);
        assert_eq!(parse_decimal("abc"), 0.0);
        assert_eq!(parse_decimal("."), 0.0);
    }

    #[test]
    fn round_half_up_matches_display_rounding() {
        assert_eq!(round_half_up(2.5), 3.0);
        assert_eq!(round_half_up(-2.5), -2.0);
        assert_eq!(round_half_up(0.49999999999999994), 0.0);
        assert!(round_half_up(-0.2).is_sign_positive());
    }

    #[test]
    fn amount_of_simple_line() {
        assert_eq!(amount("2", "100"), "200");
        assert_eq!(amount("1.5", "3"), "5");
        assert_eq!(amount("3", "33.33"), "100");
    }

    #[test]
    fn amount_degrades_to_zero() {
        for (qty, rate) in [("", "100"), ("abc", "100"), ("2", ""), ("2", "abc"), ("0", "5")] {
            assert_eq!(amount(qty, rate), "0", "qty={qty:?} rate={rate:?}");
        }
        assert_eq!(amount("1e308", "1e308"), "0");
        assert_eq!(amount("-0.2", "1"), "0");
    }

    #[test]
    fn sub_total_sums_before_rounding() {
        let lines = vec![
            ProductLine::new("a", "2", "100"),
            ProductLine::new("b", "1", "0"),
            ProductLine::new("c", "", ""),
        ];
        assert_eq!(sub_total(&lines), 200.0);

        // 0.4 + 0.4 rounds to 1 as a total, while each line rounds to 0
        let lines = vec![
            ProductLine::new("a", "1", "0.4"),
            ProductLine::new("b", "1", "0.4"),
        ];
        assert_eq!(amount("1", "0.4"), "0");
        assert_eq!(round_half_up(sub_total(&lines)), 1.0);
    }

    #[test]
    fn tax_from_label() {
        assert_eq!(tax_rate("Sale Tax (10%)"), 10.0);
        assert_eq!(tax_rate("VAT 18% / levy 2%"), 18.0);
        assert_eq!(tax_rate("Sale Tax"), 0.0);
        assert_eq!(tax_rate("Tax (.5%)"), 5.0);
        assert_eq!(sale_tax(200.0, "Sale Tax (10%)"), 20.0);
        assert_eq!(sale_tax(200.0, "Sale Tax"), 0.0);
        assert_eq!(sale_tax(0.0, "Sale Tax (10%)"), 0.0);
    }

    #[test]
    fn tax_rate_reads_ascii_digits_only() {
        // Arabic-Indic three is not a rate; the first ASCII percentage is
        assert_eq!(tax_rate("\u{663}% levy, VAT 10%"), 10.0);
    }

    #[test]
    fn words_for_amount_guards_input() {
        assert_eq!(words_for_amount(-5.0), "Zero");
        assert_eq!(words_for_amount(f64::NAN), "Zero");
        assert_eq!(words_for_amount(20.5), "Twenty-One");
        assert_eq!(words_for_amount(f64::INFINITY), "Zero");
    }

    #[test]
    fn huge_lines_keep_every_output_in_step() {
        let lines = vec![ProductLine::new("x", "1e10", "1e10")];
        assert_eq!(amount("1e10", "1e10"), "100000000000000000000");
        assert_eq!(sub_total(&lines), 1e20);
        assert_eq!(words_for_amount(sub_total(&lines)), "One Hundred Billion Billion");

        // a sum that overflows counts as zero, like an overflowing line
        let lines = vec![
            ProductLine::new("a", "1e308", "1"),
            ProductLine::new("b", "1e308", "1"),
        ];
        assert_eq!(sub_total(&lines), 0.0);
    }

    #[test]
    fn totals_of_seed_invoice() {
        let mut invoice = Invoice::default();
        let totals = Totals::compute(&invoice);
        assert_eq!(totals.sub_total, 200.0);
        assert_eq!(totals.tax_rate, 10.0);
        assert_eq!(totals.sale_tax, 20.0);
        assert_eq!(totals.total, 200.0);
        assert_eq!(totals.total_in_words, "Two Hundred");

        // recomputing leaves both the lines and the result untouched
        let lines_before = invoice.product_lines.clone();
        assert_eq!(Totals::compute(&invoice), totals);
        assert_eq!(invoice.product_lines, lines_before);

        invoice.tax_label = "No tax".to_string();
        assert_eq!(Totals::compute(&invoice).sale_tax, 0.0);
    }
}
