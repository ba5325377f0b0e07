//! Structured equality filters.
//!
//! Handlers never build query strings themselves; they describe the rows
//! they want as a list of field = value equalities and each backend renders
//! that into its own wire form. The Airtable renderer escapes values going
//! into `filterByFormula`, closing the interpolation hole the handlers would
//! otherwise reopen with every query.

/// A conjunction of field = value equality conditions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    conditions: Vec<(String, String)>,
}

impl Filter {
    /// An empty filter (matches every row).
    #[must_use]
    pub const fn new() -> Self {
        Self {
            conditions: Vec::new(),
        }
    }

    /// Add a field = value condition.
    #[must_use]
    pub fn eq(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.conditions.push((field.into(), value.into()));
        self
    }

    /// The accumulated conditions.
    #[must_use]
    pub fn conditions(&self) -> &[(String, String)] {
        &self.conditions
    }

    /// Whether the filter has no conditions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Render the filter as an Airtable `filterByFormula` expression.
    ///
    /// Returns `None` for an empty filter (Airtable treats an absent formula
    /// as match-all).
    #[must_use]
    pub fn to_airtable_formula(&self) -> Option<String> {
        if self.conditions.is_empty() {
            return None;
        }

        let clauses: Vec<String> = self
            .conditions
            .iter()
            .map(|(field, value)| format!("{{{field}}} = '{}'", escape_formula_value(value)))
            .collect();

        Some(if clauses.len() == 1 {
            clauses.concat()
        } else {
            format!("AND({})", clauses.join(", "))
        })
    }

    /// Render the filter as PostgREST query parameters (`field=eq.value`).
    #[must_use]
    pub fn to_postgrest_params(&self) -> Vec<(String, String)> {
        self.conditions
            .iter()
            .map(|(field, value)| (field.clone(), format!("eq.{value}")))
            .collect()
    }
}

/// Escape a value for inclusion in a single-quoted Airtable formula string.
fn escape_formula_value(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_filter_renders_no_formula() {
        assert_eq!(Filter::new().to_airtable_formula(), None);
        assert!(Filter::new().to_postgrest_params().is_empty());
    }

    #[test]
    fn single_condition_formula() {
        let filter = Filter::new().eq("email", "jane@example.com");
        assert_eq!(
            filter.to_airtable_formula().expect("formula"),
            "{email} = 'jane@example.com'"
        );
    }

    #[test]
    fn multiple_conditions_join_with_and() {
        let filter = Filter::new().eq("order_id", "981234").eq("customer_id", "42");
        assert_eq!(
            filter.to_airtable_formula().expect("formula"),
            "AND({order_id} = '981234', {customer_id} = '42')"
        );
    }

    #[test]
    fn formula_escapes_quotes_and_backslashes() {
        // A hostile identity value must not be able to terminate the quoted
        // string and splice in formula syntax.
        let filter = Filter::new().eq("email", "x') = '', OR(TRUE(), '");
        let formula = filter.to_airtable_formula().expect("formula");
        assert_eq!(formula, "{email} = 'x\\') = \\'\\', OR(TRUE(), \\''");

        let filter = Filter::new().eq("email", r"back\slash'quote");
        assert_eq!(
            filter.to_airtable_formula().expect("formula"),
            r"{email} = 'back\\slash\'quote'"
        );
    }

    #[test]
    fn postgrest_params_prefix_eq() {
        let filter = Filter::new().eq("id", "42");
        assert_eq!(
            filter.to_postgrest_params(),
            vec![("id".to_owned(), "eq.42".to_owned())]
        );
    }
}
