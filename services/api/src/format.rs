//! Display formatting for dashboard values (US dollars, one-decimal percents).

/// Insert thousands separators into a string of ASCII digits.
fn group_thousands(digits: &str) -> String {
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

/// Whole-dollar currency: `$1,235`, `-$1,235`, `$0`.
///
/// Negatives that round to zero print unsigned (`$0`, not `-$0`).
pub fn format_currency(value: f64) -> String {
    if !value.is_finite() {
        return "$0".to_string();
    }
    // f64::round rounds half away from zero
    let rounded = value.round();
    if rounded == 0.0 {
        return "$0".to_string();
    }
    let digits = format!("{:.0}", rounded.abs());
    let sign = if rounded < 0.0 { "-" } else { "" };
    format!("{}${}", sign, group_thousands(&digits))
}

/// One fractional digit and a `%` suffix: `12.3%`.
///
/// Negatives that round to zero print unsigned (`0.0%`, not `-0.0%`).
pub fn format_percent(value: f64) -> String {
    if !value.is_finite() {
        return "0.0%".to_string();
    }
    let text = format!("{:.1}", value);
    if text == "-0.0" {
        "0.0%".to_string()
    } else {
        format!("{}%", text)
    }
}

/// Plain number with thousands separators and up to three decimals.
pub fn format_count(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    let text = format!("{:.3}", value.abs());
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), ""));
    let frac = frac_part.trim_end_matches('0');

    let mut out = String::new();
    if value < 0.0 && (int_part != "0" || !frac.is_empty()) {
        out.push('-');
    }
    out.push_str(&group_thousands(int_part));
    if !frac.is_empty() {
        out.push('.');
        out.push_str(frac);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_whole_units() {
        assert_eq!(format_currency(0.0), "$0");
        assert_eq!(format_currency(261.96), "$262");
        assert_eq!(format_currency(1234.5), "$1,235");
        assert_eq!(format_currency(2_297_200.8603), "$2,297,201");
        assert_eq!(format_currency(999.4), "$999");
    }

    #[test]
    fn test_currency_negative() {
        assert_eq!(format_currency(-383.03), "-$383");
        assert_eq!(format_currency(-1234.5), "-$1,235");
        assert_eq!(format_currency(-0.2), "$0");
        assert_eq!(format_currency(-0.5), "-$1");
    }

    #[test]
    fn test_currency_non_finite() {
        assert_eq!(format_currency(f64::NAN), "$0");
        assert_eq!(format_currency(f64::INFINITY), "$0");
    }

    #[test]
    fn test_percent_one_decimal() {
        assert_eq!(format_percent(0.0), "0.0%");
        assert_eq!(format_percent(12.345), "12.3%");
        assert_eq!(format_percent(-7.26), "-7.3%");
        assert_eq!(format_percent(-0.01), "0.0%");
        assert_eq!(format_percent(-0.04), "0.0%");
        assert_eq!(format_percent(100.0), "100.0%");
    }

    #[test]
    fn test_count() {
        assert_eq!(format_count(0.0), "0");
        assert_eq!(format_count(37873.0), "37,873");
        assert_eq!(format_count(1234.5), "1,234.5");
        assert_eq!(format_count(-1000.0), "-1,000");
        assert_eq!(format_count(2.0004), "2");
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands("1"), "1");
        assert_eq!(group_thousands("123"), "123");
        assert_eq!(group_thousands("1234"), "1,234");
        assert_eq!(group_thousands("1234567"), "1,234,567");
    }
}
