//! Parse-or-default helpers for loosely formatted money values

use regex::Regex;
use std::sync::LazyLock;

static NON_NUMERIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^0-9.\-]").expect("valid amount regex"));

/// Parse an amount the forgiving way: drop everything that is not a digit,
/// `.` or `-`, then read what is left as a float.
///
/// Never fails. Anything that does not yield a finite number is `0.0`, so a
/// zero result is ambiguous between "really zero" and "garbage".
pub fn parse_amount(raw: Option<&str>) -> f64 {
    let Some(raw) = raw else {
        return 0.0;
    };
    let cleaned = NON_NUMERIC.replace_all(raw, "");
    if cleaned.is_empty() {
        return 0.0;
    }
    match cleaned.parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_currency_and_separators() {
        assert_eq!(parse_amount(Some("₹1,234.50")), 1234.5);
        assert_eq!(parse_amount(Some("$ 5.82 ")), 5.82);
        assert_eq!(parse_amount(Some("1 200")), 1200.0);
    }

    #[test]
    fn test_negative_and_fractional() {
        assert_eq!(parse_amount(Some("-50")), -50.0);
        assert_eq!(parse_amount(Some(".5")), 0.5);
        assert_eq!(parse_amount(Some("- $14.05")), -14.05);
    }

    #[test]
    fn test_garbage_is_zero() {
        assert_eq!(parse_amount(Some("abc")), 0.0);
        assert_eq!(parse_amount(Some("")), 0.0);
        assert_eq!(parse_amount(None), 0.0);
        assert_eq!(parse_amount(Some("-")), 0.0);
        assert_eq!(parse_amount(Some("1.2.3")), 0.0);
        assert_eq!(parse_amount(Some("10-20")), 0.0);
    }

    #[test]
    fn test_overflow_is_zero() {
        let huge = "9".repeat(400);
        assert_eq!(parse_amount(Some(&huge)), 0.0);
    }
}
