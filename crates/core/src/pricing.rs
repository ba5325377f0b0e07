//! Discount-aware price computation.
//!
//! Product records carry an optional `current_discount` field holding a
//! percentage. The records API hands it back as whatever the sheet contains:
//! a number, a numeric string, or junk. Junk means no discount, not an error.

use rust_decimal::Decimal;
use serde_json::Value;

/// Parse a discount percentage from a raw record field.
///
/// Accepts a JSON number or a numeric string. Anything else (including
/// absence) is treated as no discount.
#[must_use]
pub fn parse_discount(raw: Option<&Value>) -> Option<Decimal> {
    match raw {
        Some(Value::Number(n)) => n.as_f64().and_then(|f| Decimal::try_from(f).ok()),
        Some(Value::String(s)) => s.trim().parse::<Decimal>().ok(),
        _ => None,
    }
}

/// Compute the final price after applying a percentage discount.
///
/// `final = price × (1 − discount/100)` when a discount is present;
/// otherwise the price is returned unchanged.
#[must_use]
pub fn final_price(price: Decimal, discount_percent: Option<Decimal>) -> Decimal {
    match discount_percent {
        Some(discount) => price * (Decimal::ONE - discount / Decimal::ONE_HUNDRED),
        None => price,
    }
}

/// Convenience wrapper: apply a raw `current_discount` field to a price.
#[must_use]
pub fn apply_discount_field(price: Decimal, raw: Option<&Value>) -> Decimal {
    final_price(price, parse_discount(raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn twenty_percent_off_one_hundred_is_eighty() {
        let price = Decimal::new(100, 0);
        let result = apply_discount_field(price, Some(&json!(20)));
        assert_eq!(result, Decimal::new(80, 0));
    }

    #[test]
    fn numeric_string_discount_applies() {
        let price = Decimal::new(100, 0);
        let result = apply_discount_field(price, Some(&json!("25")));
        assert_eq!(result, Decimal::new(75, 0));
    }

    #[test]
    fn non_numeric_discount_leaves_price_unchanged() {
        let price = Decimal::new(100, 0);
        let result = apply_discount_field(price, Some(&json!("abc")));
        assert_eq!(result, price);
    }

    #[test]
    fn missing_discount_leaves_price_unchanged() {
        let price = Decimal::new(5999, 2);
        assert_eq!(apply_discount_field(price, None), price);
        assert_eq!(apply_discount_field(price, Some(&Value::Null)), price);
    }

    #[test]
    fn fractional_discount() {
        let price = Decimal::new(8000, 2); // 80.00
        let result = apply_discount_field(price, Some(&json!(12.5)));
        assert_eq!(result, Decimal::new(7000, 2)); // 70.00
    }

    #[test]
    fn zero_discount_is_identity() {
        let price = Decimal::new(100, 0);
        assert_eq!(apply_discount_field(price, Some(&json!(0))), price);
    }
}
