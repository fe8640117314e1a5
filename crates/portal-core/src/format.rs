//! Conversion between base-unit integer strings and human-readable decimals
//!
//! Amounts travel as decimal strings because token balances routinely exceed
//! `u64` (24-decimal tokens), so no numeric type is involved.

/// Format a base-unit integer string as a decimal amount.
///
/// `decimals` is `None` when the token metadata carried no usable decimals
/// count; the value is then returned unmodified. Empty, missing, zero or
/// non-numeric input formats as `"0"`.
///
/// ```
/// use portal_core::format::format_decimal_amount;
/// assert_eq!(format_decimal_amount(Some("1234567"), Some(2)), "12,345.67");
/// ```
pub fn format_decimal_amount(value: Option<&str>, decimals: Option<u32>) -> String {
    let value = match value {
        Some(v) => v.replace(',', ""),
        None => return "0".to_string(),
    };
    let value = value.trim();

    if value.is_empty() || value == "0" {
        return "0".to_string();
    }

    let decimals = match decimals {
        Some(d) => d as usize,
        None => {
            tracing::warn!("Missing decimals when formatting {}", value);
            return value.to_string();
        }
    };

    if !value.chars().all(|c| c.is_ascii_digit()) {
        tracing::warn!("Cannot format non-numeric amount '{}'", value);
        return "0".to_string();
    }

    let padded = format!("{:0>width$}", value, width = decimals + 1);
    let (whole, fraction) = padded.split_at(padded.len() - decimals);

    let whole = match whole.trim_start_matches('0') {
        "" => "0",
        w => w,
    };
    let whole = format_with_commas(whole);

    if decimals == 0 {
        return whole;
    }

    let fraction = fraction.trim_end_matches('0');
    if fraction.is_empty() {
        whole
    } else {
        format!("{}.{}", whole, fraction)
    }
}

/// Parse a decimal amount into a base-unit integer string.
///
/// Thousands separators are ignored. Returns `None` for empty input, more than
/// one decimal point, a fractional part longer than `decimals`, or any other
/// non-digit character.
pub fn parse_decimal_amount(amount: Option<&str>, decimals: Option<u32>) -> Option<String> {
    let amount = amount?.replace(',', "");
    let amount = amount.trim();

    if amount.is_empty() {
        return None;
    }

    let decimals = match decimals {
        Some(d) => d as usize,
        None => {
            tracing::warn!("Missing decimals when parsing {}", amount);
            return Some(amount.to_string());
        }
    };

    let mut parts = amount.split('.');
    let whole = parts.next().unwrap_or_default();
    let fraction = parts.next().unwrap_or_default();

    if parts.next().is_some() || fraction.len() > decimals {
        tracing::debug!("Cannot parse '{}' as decimal amount", amount);
        return None;
    }

    if !whole.chars().chain(fraction.chars()).all(|c| c.is_ascii_digit()) {
        tracing::debug!("Cannot parse '{}' as decimal amount", amount);
        return None;
    }

    let combined = format!("{}{:0<width$}", whole, fraction, width = decimals);
    Some(trim_leading_zeroes(&combined))
}

fn format_with_commas(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

fn trim_leading_zeroes(value: &str) -> String {
    match value.trim_start_matches('0') {
        "" => "0".to_string(),
        v => v.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_basic() {
        assert_eq!(format_decimal_amount(Some("1234567"), Some(2)), "12,345.67");
        assert_eq!(format_decimal_amount(Some("1000000"), Some(6)), "1");
        assert_eq!(format_decimal_amount(Some("1500000"), Some(6)), "1.5");
        assert_eq!(format_decimal_amount(Some("1"), Some(6)), "0.000001");
        assert_eq!(
            format_decimal_amount(Some("1000000000000000000000000"), Some(24)),
            "1"
        );
    }

    #[test]
    fn test_format_zero_and_missing() {
        for d in [0, 2, 18, 24] {
            assert_eq!(format_decimal_amount(Some("0"), Some(d)), "0");
            assert_eq!(format_decimal_amount(None, Some(d)), "0");
            assert_eq!(format_decimal_amount(Some(""), Some(d)), "0");
        }
        assert_eq!(format_decimal_amount(Some("000"), Some(2)), "0");
    }

    #[test]
    fn test_format_zero_decimals() {
        assert_eq!(format_decimal_amount(Some("1234567"), Some(0)), "1,234,567");
        assert_eq!(format_decimal_amount(Some("100"), Some(0)), "100");
    }

    #[test]
    fn test_format_missing_decimals_passthrough() {
        assert_eq!(format_decimal_amount(Some("123456"), None), "123456");
    }

    #[test]
    fn test_format_strips_commas_and_whitespace() {
        assert_eq!(format_decimal_amount(Some(" 1,234,567 "), Some(2)), "12,345.67");
    }

    #[test]
    fn test_format_non_numeric() {
        assert_eq!(format_decimal_amount(Some("abc"), Some(2)), "0");
        assert_eq!(format_decimal_amount(Some("-100"), Some(2)), "0");
    }

    #[test]
    fn test_format_leading_zeroes_in_input() {
        assert_eq!(format_decimal_amount(Some("000123"), Some(2)), "1.23");
    }

    #[test]
    fn test_parse_basic() {
        assert_eq!(
            parse_decimal_amount(Some("12,345.67"), Some(2)),
            Some("1234567".to_string())
        );
        assert_eq!(parse_decimal_amount(Some("1.5"), Some(6)), Some("1500000".to_string()));
        assert_eq!(parse_decimal_amount(Some("0.000001"), Some(6)), Some("1".to_string()));
        assert_eq!(parse_decimal_amount(Some("42"), Some(0)), Some("42".to_string()));
        assert_eq!(parse_decimal_amount(Some(".5"), Some(1)), Some("5".to_string()));
        assert_eq!(parse_decimal_amount(Some("0"), Some(18)), Some("0".to_string()));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert_eq!(parse_decimal_amount(Some("1.234"), Some(2)), None);
        assert_eq!(parse_decimal_amount(Some("1.2.3"), Some(6)), None);
        assert_eq!(parse_decimal_amount(Some("1.5"), Some(0)), None);
        assert_eq!(parse_decimal_amount(Some("1e5"), Some(2)), None);
        assert_eq!(parse_decimal_amount(Some(""), Some(2)), None);
        assert_eq!(parse_decimal_amount(Some("  "), Some(2)), None);
        assert_eq!(parse_decimal_amount(None, Some(2)), None);
    }

    #[test]
    fn test_parse_missing_decimals_passthrough() {
        assert_eq!(parse_decimal_amount(Some("1.5"), None), Some("1.5".to_string()));
    }

    #[test]
    fn test_parse_then_format_is_identity() {
        let cases = [
            ("12,345.67", 2),
            ("0.000001", 6),
            ("1", 24),
            ("1,234,567", 0),
            ("999,999,999.123456789012345678", 18),
            ("0.5", 1),
            ("0", 8),
        ];
        for (s, d) in cases {
            let raw = parse_decimal_amount(Some(s), Some(d)).unwrap();
            assert_eq!(format_decimal_amount(Some(&raw), Some(d)), s, "decimals={}", d);
        }
    }

    #[test]
    fn test_format_then_parse_is_identity() {
        for (raw, d) in [("1234567", 2), ("1", 24), ("100000", 3), ("7", 0)] {
            let shown = format_decimal_amount(Some(raw), Some(d));
            assert_eq!(parse_decimal_amount(Some(&shown), Some(d)).unwrap(), raw);
        }
    }
}
