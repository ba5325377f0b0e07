//! Parsing of the `x-identity` request header.
//!
//! Every customer-facing handler receives the caller's lookup key in an
//! `x-identity` header formatted `"<kind>:<value>"`. Three kinds are
//! recognized: `email:`, `phone:`, and `whatsapp:` (WhatsApp handles are
//! phone numbers and are looked up against the phone column).

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing an [`Identity`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum IdentityError {
    /// The header is missing entirely.
    #[error(
        "Missing x-identity header. Provide email or phone in the format: \
         \"email:<email>\" or \"phone:<phone>\"."
    )]
    Missing,
    /// The header does not start with a recognized prefix.
    #[error("Invalid x-identity format. Use \"email:<email>\" or \"phone:<phone>\".")]
    UnrecognizedPrefix,
    /// The header has a recognized prefix but nothing after it.
    #[error("Empty x-identity value. Use \"email:<email>\" or \"phone:<phone>\".")]
    EmptyValue,
}

/// The record-store column an identity resolves against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LookupField {
    Email,
    Phone,
}

impl LookupField {
    /// Column name in the customers/orders tables.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Phone => "phone",
        }
    }
}

impl fmt::Display for LookupField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed customer lookup key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Which column to filter on.
    pub field: LookupField,
    /// The value to match, whitespace-trimmed.
    pub value: String,
}

impl Identity {
    /// Parse an `x-identity` header value.
    ///
    /// `whatsapp:` is treated as a phone lookup.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::UnrecognizedPrefix`] if the header does not
    /// start with `email:`, `phone:`, or `whatsapp:`, and
    /// [`IdentityError::EmptyValue`] if nothing follows the prefix.
    pub fn parse(header: &str) -> Result<Self, IdentityError> {
        let (field, rest) = if let Some(rest) = header.strip_prefix("email:") {
            (LookupField::Email, rest)
        } else if let Some(rest) = header.strip_prefix("phone:") {
            (LookupField::Phone, rest)
        } else if let Some(rest) = header.strip_prefix("whatsapp:") {
            (LookupField::Phone, rest)
        } else {
            return Err(IdentityError::UnrecognizedPrefix);
        };

        let value = rest.trim();
        if value.is_empty() {
            return Err(IdentityError::EmptyValue);
        }

        Ok(Self {
            field,
            value: value.to_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_email_identity() {
        let identity = Identity::parse("email:jane@example.com").expect("should parse");
        assert_eq!(identity.field, LookupField::Email);
        assert_eq!(identity.value, "jane@example.com");
    }

    #[test]
    fn parses_phone_identity() {
        let identity = Identity::parse("phone:+15551234567").expect("should parse");
        assert_eq!(identity.field, LookupField::Phone);
        assert_eq!(identity.value, "+15551234567");
    }

    #[test]
    fn whatsapp_maps_to_phone() {
        let identity = Identity::parse("whatsapp:+15551234567").expect("should parse");
        assert_eq!(identity.field, LookupField::Phone);
        assert_eq!(identity.value, "+15551234567");
    }

    #[test]
    fn trims_whitespace_around_value() {
        let identity = Identity::parse("email:  jane@example.com  ").expect("should parse");
        assert_eq!(identity.value, "jane@example.com");
    }

    #[test]
    fn rejects_unrecognized_prefix() {
        assert_eq!(
            Identity::parse("fax:+15551234567"),
            Err(IdentityError::UnrecognizedPrefix)
        );
        assert_eq!(
            Identity::parse("jane@example.com"),
            Err(IdentityError::UnrecognizedPrefix)
        );
        assert_eq!(Identity::parse(""), Err(IdentityError::UnrecognizedPrefix));
    }

    #[test]
    fn rejects_empty_value() {
        assert_eq!(Identity::parse("email:"), Err(IdentityError::EmptyValue));
        assert_eq!(Identity::parse("phone:   "), Err(IdentityError::EmptyValue));
    }

    #[test]
    fn lookup_field_column_names() {
        assert_eq!(LookupField::Email.as_str(), "email");
        assert_eq!(LookupField::Phone.as_str(), "phone");
    }
}
