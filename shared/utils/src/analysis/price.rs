//! Price cleanup for fields the model labels as prices.
//!
//! `"$1,234.5"`, `1234.5` and `"1234.50"` all render as `"1,234.50"`.
//! Values that do not parse as a number are left alone. Amounts are decimal
//! throughout and round half away from zero.

use rust_decimal::{Decimal, RoundingStrategy};
use serde_json::Value;
use std::str::FromStr;

pub fn is_price_field(name: &str) -> bool {
    name.to_ascii_lowercase().contains("price")
}

/// Strip `$`, thousands separators and spaces, then parse as a decimal.
pub fn parse_price(raw: &str) -> Option<Decimal> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| !matches!(c, '$' | ',' | ' '))
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    Decimal::from_str(&cleaned)
        .or_else(|_| Decimal::from_scientific(&cleaned))
        .ok()
}

/// Two fraction digits, `,` between thousands.
pub fn format_price(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let mut magnitude = rounded.abs();
    magnitude.rescale(2);

    let fixed = magnitude.to_string();
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    format!("{}{}.{}", if negative { "-" } else { "" }, grouped, frac_part)
}

pub fn clean_price_text(raw: &str) -> Option<String> {
    parse_price(raw).map(format_price)
}

/// Formatted replacement for a price-like JSON value, if it parses.
pub fn clean_price_value(value: &Value) -> Option<Value> {
    match value {
        Value::String(s) => clean_price_text(s).map(Value::String),
        Value::Number(n) => clean_price_text(&n.to_string()).map(Value::String),
        _ => None,
    }
}

/// Rewrite price-named entries of an object in place.
pub fn clean_price_fields(object: &mut serde_json::Map<String, Value>) {
    for (key, value) in object.iter_mut() {
        if !is_price_field(key) {
            continue;
        }
        if let Some(cleaned) = clean_price_value(value) {
            *value = cleaned;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_is_price_field() {
        assert!(is_price_field("price"));
        assert!(is_price_field("Sale Price (USD)"));
        assert!(is_price_field("estimated_price"));
        assert!(!is_price_field("artist"));
    }

    fn dec(text: &str) -> Decimal {
        Decimal::from_str(text).unwrap()
    }

    #[test]
    fn test_parse_price() {
        assert_eq!(parse_price("$1,234.5"), Some(dec("1234.5")));
        assert_eq!(parse_price(" 12 "), Some(dec("12")));
        assert_eq!(parse_price("1.5e3"), Some(dec("1500")));
        assert_eq!(parse_price("$"), None);
        assert_eq!(parse_price("-"), None);
        assert_eq!(parse_price("on request"), None);
        assert_eq!(parse_price("NaN"), None);
    }

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(dec("0")), "0.00");
        assert_eq!(format_price(dec("999.999")), "1,000.00");
        assert_eq!(format_price(dec("1234.5")), "1,234.50");
        assert_eq!(format_price(dec("1234567.891")), "1,234,567.89");
        assert_eq!(format_price(dec("-42.1")), "-42.10");
        assert_eq!(format_price(dec("-0.001")), "0.00");
    }

    #[test]
    fn test_format_price_is_exact_for_decimals() {
        assert_eq!(format_price(dec("0.125")), "0.13");
        assert_eq!(format_price(dec("2.675")), "2.68");
        assert_eq!(format_price(dec("-0.125")), "-0.13");
        assert_eq!(
            clean_price_text("12345678901234567.89").as_deref(),
            Some("12,345,678,901,234,567.89")
        );
    }

    #[test]
    fn test_cleanup_is_idempotent() {
        let once = clean_price_text("$12,345.6").unwrap();
        assert_eq!(once, "12,345.60");
        assert_eq!(clean_price_text(&once).unwrap(), once);
    }

    #[test]
    fn test_clean_price_fields_only_touches_price_keys() {
        let mut object = json!({
            "title": "Untitled",
            "price": "$2,500",
            "hammer_price": 1800,
            "estimate_price": "unknown",
            "year": 1999
        });
        clean_price_fields(object.as_object_mut().unwrap());

        assert_eq!(object["price"], json!("2,500.00"));
        assert_eq!(object["hammer_price"], json!("1,800.00"));
        assert_eq!(object["estimate_price"], json!("unknown"));
        assert_eq!(object["year"], json!(1999));
    }
}
