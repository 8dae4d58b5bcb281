const ONES: [&str; 20] = [
    "Zero",
    "One",
    "Two",
    "Three",
    "Four",
    "Five",
    "Six",
    "Seven",
    "Eight",
    "Nine",
    "Ten",
    "Eleven",
    "Twelve",
    "Thirteen",
    "Fourteen",
    "Fifteen",
    "Sixteen",
    "Seventeen",
    "Eighteen",
    "Nineteen",
];

const TENS: [&str; 10] = [
    "", "", "Twenty", "Thirty", "Forty", "Fifty", "Sixty", "Seventy", "Eighty", "Ninety",
];

/// Words for 1..=999
fn below_thousand(n: u64) -> String {
    match n {
        0..=19 => ONES[n as usize].to_string(),
        20..=99 => {
            let tens = TENS[(n / 10) as usize];
            match n % 10 {
                0 => tens.to_string(),
                ones => format!("{}-{}", tens, ONES[ones as usize]),
            }
        }
        _ => {
            let hundreds = format!("{} Hundred", ONES[(n / 100) as usize]);
            match n % 100 {
                0 => hundreds,
                rest => format!("{} {}", hundreds, below_thousand(rest)),
            }
        }
    }
}

/// English words for a non-negative integer, e.g. 1050 -> "One Thousand Fifty".
///
/// Grouped by Billion, Million and Thousand; empty groups are skipped so
/// round numbers do not end in "Zero". A billions group past 999 is spelled
/// with the full converter ("One Thousand Billion").
pub fn to_words(n: u64) -> String {
    if n == 0 {
        return ONES[0].to_string();
    }

    let billions = n / 1_000_000_000;
    let millions = (n % 1_000_000_000) / 1_000_000;
    let thousands = (n % 1_000_000) / 1_000;
    let remainder = n % 1_000;

    let mut words = String::new();

    if billions > 0 {
        let group = if billions < 1_000 {
            below_thousand(billions)
        } else {
            to_words(billions)
        };
        words.push_str(&group);
        words.push_str(" Billion ");
    }

    for (group, magnitude) in [(millions, "Million"), (thousands, "Thousand")] {
        if group > 0 {
            words.push_str(&below_thousand(group));
            words.push(' ');
            words.push_str(magnitude);
            words.push(' ');
        }
    }

    if remainder > 0 || words.is_empty() {
        words.push_str(&below_thousand(remainder));
    }

    words.trim().to_string()
}

/// Words for a whole number given as decimal digits, for amounts past
/// `u64::MAX`. Follows [`to_words`]: everything above the last nine digits
/// is a billions group spelled with the full converter.
pub fn digits_to_words(digits: &str) -> String {
    let digits = digits.trim_start_matches('0');
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return ONES[0].to_string();
    }
    if let Ok(n) = digits.parse::<u64>() {
        return to_words(n);
    }

    let (billions, rest) = digits.split_at(digits.len() - 9);
    let mut words = format!("{} Billion", digits_to_words(billions));
    match rest.parse::<u64>() {
        Ok(0) | Err(_) => {}
        Ok(rest) => {
            words.push(' ');
            words.push_str(&to_words(rest));
        }
    }
    words
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_numbers() {
        assert_eq!(to_words(0), "Zero");
        assert_eq!(to_words(7), "Seven");
        assert_eq!(to_words(13), "Thirteen");
        assert_eq!(to_words(20), "Twenty");
        assert_eq!(to_words(21), "Twenty-One");
        assert_eq!(to_words(99), "Ninety-Nine");
    }

    #[test]
    fn hundreds() {
        assert_eq!(to_words(100), "One Hundred");
        assert_eq!(to_words(500), "Five Hundred");
        assert_eq!(to_words(101), "One Hundred One");
        assert_eq!(to_words(342), "Three Hundred Forty-Two");
    }

    #[test]
    fn magnitudes() {
        assert_eq!(to_words(1000), "One Thousand");
        assert_eq!(to_words(1050), "One Thousand Fifty");
        assert_eq!(to_words(20_000), "Twenty Thousand");
        assert_eq!(to_words(1_000_001), "One Million One");
        assert_eq!(
            to_words(2_500_000),
            "Two Million Five Hundred Thousand"
        );
        assert_eq!(
            to_words(1_234_567_891),
            "One Billion Two Hundred Thirty-Four Million Five Hundred Sixty-Seven Thousand \
             Eight Hundred Ninety-One"
        );
        assert_eq!(to_words(3_000_000_000), "Three Billion");
    }

    #[test]
    fn billions_past_nine_hundred_ninety_nine() {
        assert_eq!(to_words(1_000_000_000_000), "One Thousand Billion");
        assert!(!to_words(u64::MAX).contains("  "));
    }

    #[test]
    fn digit_strings_match_the_integer_converter() {
        for n in [0, 21, 1_050, 3_000_000_000, 1_000_000_000_000, u64::MAX] {
            assert_eq!(digits_to_words(&n.to_string()), to_words(n), "n={n}");
        }
        assert_eq!(digits_to_words("0007"), "Seven");
        assert_eq!(digits_to_words(""), "Zero");
    }

    #[test]
    fn digit_strings_past_u64() {
        assert_eq!(
            digits_to_words("100000000000000000000"),
            "One Hundred Billion Billion"
        );

        // u64::MAX + 1
        let words = digits_to_words("18446744073709551616");
        assert!(words.starts_with("Eighteen Billion Four Hundred Forty-Six Million"));
        assert!(words.ends_with("Billion Seven Hundred Nine Million Five Hundred Fifty-One Thousand Six Hundred Sixteen"));
        assert!(!words.contains("  "));
    }

    #[test]
    fn trimmed_and_hundred_only_when_a_group_has_one() {
        for n in (0..5_000u64).chain([1_100_000, 2_000_300, 999_999_999, 1_000_000_000]) {
            let words = to_words(n);
            assert_eq!(words, words.trim(), "n={n}");
            assert!(!words.contains("  "), "n={n}");

            let groups = [
                n / 1_000_000_000,
                (n % 1_000_000_000) / 1_000_000,
                (n % 1_000_000) / 1_000,
                n % 1_000,
            ];
            let has_hundred = groups.iter().any(|g| *g > 0 && g % 1000 >= 100);
            assert_eq!(words.contains("Hundred"), has_hundred, "n={n} words={words}");
        }
    }
}
