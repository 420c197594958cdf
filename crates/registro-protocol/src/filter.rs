//! Search criteria sent to the filtered listing endpoint.

use serde::{Deserialize, Serialize};

/// Name/city filter. Empty fields are omitted from the query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchFilter {
    #[serde(default)]
    pub nombre: String,
    #[serde(default)]
    pub ciudad: String,
}

impl SearchFilter {
    /// True when neither field carries a value.
    pub fn is_empty(&self) -> bool {
        self.nombre.is_empty() && self.ciudad.is_empty()
    }

    /// Query parameters for the non-empty fields, `nombre` first.
    pub fn query_pairs(&self) -> Vec<(&'static str, &str)> {
        let mut pairs = Vec::with_capacity(2);
        if !self.nombre.is_empty() {
            pairs.push(("nombre", self.nombre.as_str()));
        }
        if !self.ciudad.is_empty() {
            pairs.push(("ciudad", self.ciudad.as_str()));
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::SearchFilter;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_filter_has_no_pairs() {
        let filter = SearchFilter::default();
        assert!(filter.is_empty());
        assert!(filter.query_pairs().is_empty());
    }

    #[test]
    fn city_only_filter_omits_name() {
        let filter = SearchFilter {
            nombre: String::new(),
            ciudad: "Quito".to_string(),
        };
        assert!(!filter.is_empty());
        assert_eq!(filter.query_pairs(), vec![("ciudad", "Quito")]);
    }
}
