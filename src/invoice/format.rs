/// Insert commas between groups of three digits: "1234567" -> "1,234,567"
fn group_digits(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }

    out.chars().rev().collect()
}

/// Sign handling shared by the formatters. A value that prints as zero
/// never carries a minus sign.
fn with_sign(number: &str) -> String {
    let (negative, body) = match number.strip_prefix('-') {
        Some(body) => (true, body),
        None => (false, number),
    };
    let (whole, frac) = match body.split_once('.') {
        Some((whole, frac)) => (whole, Some(frac)),
        None => (body, None),
    };

    let mut out = group_digits(whole);
    if let Some(frac) = frac {
        out.push('.');
        out.push_str(frac);
    }

    let is_zero = body.bytes().all(|b| b == b'0' || b == b'.');
    if negative && !is_zero {
        out.insert(0, '-');
    }
    out
}

/// Whole number with thousands separators: 1234567.0 -> "1,234,567".
/// Digits come from the float itself, so values past the integer types
/// print in full.
pub fn format_whole(value: f64) -> String {
    with_sign(&format!("{:.0}", value))
}

/// Two decimal places with thousands separators: 1234.5 -> "1,234.50"
pub fn format_money(value: f64) -> String {
    with_sign(&format!("{:.2}", value))
}
