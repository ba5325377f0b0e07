//! Order-confirmation digit normalization and matching.
//!
//! Callers verify which order they mean by reading back the last four
//! characters of the order id. Voice transcription mangles these freely
//! ("4 2 - A B", "42ab.", …), so the raw input is normalized before any
//! comparison: trim, strip whitespace and non-alphanumerics, take the last
//! four characters, compare case-insensitively.
//!
//! Ambiguity is always rejected rather than guessed: if two of a customer's
//! orders share a suffix the caller must disambiguate by other means.

use crate::records::Order;

/// Errors produced while matching confirmation digits against orders.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfirmationError {
    /// Fewer than four alphanumeric characters survived normalization.
    #[error("Invalid order confirmation digits. Must be 4 characters.")]
    InvalidDigits,
    /// No order id ends with the given digits.
    #[error("No order found with confirmation digits: {digits}")]
    NoMatch {
        /// The normalized digits that failed to match.
        digits: String,
    },
    /// More than one order id ends with the given digits.
    #[error("Multiple orders found with these confirmation digits.")]
    Ambiguous,
}

/// Normalize raw confirmation input to a four-character lowercase token.
///
/// Normalization is idempotent: feeding a normalized token back through
/// returns it unchanged.
///
/// # Errors
///
/// Returns [`ConfirmationError::InvalidDigits`] if fewer than four
/// alphanumeric characters remain after stripping.
pub fn normalize_digits(raw: &str) -> Result<String, ConfirmationError> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect();

    if cleaned.len() < 4 {
        return Err(ConfirmationError::InvalidDigits);
    }

    // Last four characters; the string is ASCII after filtering.
    let start = cleaned.len() - 4;
    cleaned
        .get(start..)
        .map(str::to_owned)
        .ok_or(ConfirmationError::InvalidDigits)
}

/// Whether an order id ends with the given normalized digits.
fn suffix_matches(order_id: &str, digits: &str) -> bool {
    let id = order_id.to_ascii_lowercase();
    id.len() >= 4 && id.ends_with(digits)
}

/// Find the single order whose id ends with the given confirmation digits.
///
/// `digits` must already be normalized via [`normalize_digits`].
///
/// # Errors
///
/// - [`ConfirmationError::NoMatch`] if no order matches
/// - [`ConfirmationError::Ambiguous`] if more than one order matches
pub fn match_order<'a>(orders: &'a [Order], digits: &str) -> Result<&'a Order, ConfirmationError> {
    let mut matches = orders.iter().filter(|o| suffix_matches(&o.id, digits));

    let Some(first) = matches.next() else {
        return Err(ConfirmationError::NoMatch {
            digits: digits.to_owned(),
        });
    };

    if matches.next().is_some() {
        return Err(ConfirmationError::Ambiguous);
    }

    Ok(first)
}
