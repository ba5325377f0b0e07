//! Post-call survey record.

use serde::{Deserialize, Serialize};

/// A row in the `surveys` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Survey {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub customer_id: String,
    /// 1-5, validated by the handler before insertion.
    pub rating: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl Survey {
    /// Valid rating range, inclusive.
    pub const RATING_RANGE: core::ops::RangeInclusive<u8> = 1..=5;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_range_bounds() {
        assert!(Survey::RATING_RANGE.contains(&1));
        assert!(Survey::RATING_RANGE.contains(&5));
        assert!(!Survey::RATING_RANGE.contains(&0));
        assert!(!Survey::RATING_RANGE.contains(&6));
    }
}
