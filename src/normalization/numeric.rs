//! Lenient scalar coercion for the heterogeneous BJCP source data.
//!
//! Range bounds arrive as JSON strings or numbers, sometimes blank or a
//! literal "-" placeholder. Every coercion recovers from malformed input
//! by yielding `None`; nothing in this module returns an error.

use bigdecimal::{BigDecimal, RoundingMode};
use serde_json::Value;

/// Render a raw JSON scalar as a trimmed string, when it carries one.
fn scalar_text(raw: &Value) -> Option<String> {
    match raw {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn parse_f64(raw: Option<&Value>) -> Option<f64> {
    let text = scalar_text(raw?)?;
    if text.is_empty() || text == "-" {
        return None;
    }
    text.parse::<f64>().ok()
}

/// Coerce to a decimal with exactly `scale` fractional digits.
///
/// Empty, "-", or unparseable input yields `None`. Rounding is half-even,
/// so `"5.1234"` at 2 places is exactly `5.12`.
pub fn decimal(raw: Option<&Value>, scale: i64) -> Option<BigDecimal> {
    let parsed = parse_f64(raw)?;
    BigDecimal::try_from(parsed)
        .ok()
        .map(|d| d.with_scale_round(scale, RoundingMode::HalfEven))
}

/// Gravity coercion at 3 places.
///
/// BJCP sources encode gravity both ways ("1.055" and "1055"); anything
/// above 2.0 is taken to be the integer convention and divided by 1000, so
/// both spellings coerce to the same value.
pub fn gravity(raw: Option<&Value>) -> Option<BigDecimal> {
    let mut parsed = parse_f64(raw)?;
    if parsed > 2.0 {
        parsed /= 1000.0;
    }
    BigDecimal::try_from(parsed)
        .ok()
        .map(|d| d.with_scale_round(3, RoundingMode::HalfEven))
}

/// Coerce to an integer, truncating fractional input.
pub fn int(raw: Option<&Value>) -> Option<i32> {
    parse_f64(raw).map(|v| v as i32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::str::FromStr;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    #[test]
    fn decimal_rounds_to_configured_scale() {
        let raw = json!("5.1234");
        assert_eq!(decimal(Some(&raw), 2), Some(dec("5.12")));
        let raw = json!(5.5);
        assert_eq!(decimal(Some(&raw), 2), Some(dec("5.50")));
    }

    #[test]
    fn decimal_recovers_from_bad_input() {
        assert_eq!(decimal(None, 2), None);
        assert_eq!(decimal(Some(&json!("")), 2), None);
        assert_eq!(decimal(Some(&json!("-")), 2), None);
        assert_eq!(decimal(Some(&json!("n/a")), 2), None);
        assert_eq!(decimal(Some(&json!(null)), 2), None);
    }

    #[test]
    fn gravity_handles_both_encodings() {
        assert_eq!(gravity(Some(&json!("1.055"))), Some(dec("1.055")));
        assert_eq!(gravity(Some(&json!("1055"))), Some(dec("1.055")));
        assert_eq!(gravity(Some(&json!(1048))), Some(dec("1.048")));
    }

    #[test]
    fn gravity_is_idempotent_on_scaled_input() {
        let once = gravity(Some(&json!("1.055"))).unwrap();
        let again = gravity(Some(&json!(once.to_string()))).unwrap();
        assert_eq!(once, again);
    }

    #[test]
    fn int_truncates_floats() {
        assert_eq!(int(Some(&json!("35.7"))), Some(35));
        assert_eq!(int(Some(&json!(40))), Some(40));
        assert_eq!(int(Some(&json!("forty"))), None);
        assert_eq!(int(Some(&json!(""))), None);
    }
}
