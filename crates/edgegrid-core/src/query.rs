//! Convenience builder for HTTP query parameters.
//!
//! Parameters are always emitted sorted by key (stable for repeated keys), so
//! the same request serializes to the same URL no matter in which order the
//! parameters were pushed.

use std::fmt::Display;

/// Builder for assembling query parameter pairs.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(&'static str, String)>,
}

impl QueryParams {
    /// Create a new, empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self { pairs: Vec::new() }
    }

    /// Append a key/value pair when the value is present.
    pub fn push_opt<T>(&mut self, key: &'static str, value: Option<T>)
    where
        T: Display,
    {
        if let Some(value) = value {
            self.pairs.push((key, value.to_string()));
        }
    }

    /// Append a key/value pair unless the text is empty.
    pub fn push_non_empty(&mut self, key: &'static str, value: &str) {
        if !value.is_empty() {
            self.pairs.push((key, value.to_string()));
        }
    }

    /// Append a required key/value pair.
    pub fn push<T>(&mut self, key: &'static str, value: T)
    where
        T: Display,
    {
        self.pairs.push((key, value.to_string()));
    }

    /// Chainable form of [`Self::push`].
    #[must_use]
    pub fn with<T>(mut self, key: &'static str, value: T) -> Self
    where
        T: Display,
    {
        self.push(key, value);
        self
    }

    /// Return the collected pairs sorted by key.
    #[must_use]
    pub fn into_pairs(self) -> Vec<(&'static str, String)> {
        let mut pairs = self.pairs;
        pairs.sort_by(|a, b| a.0.cmp(b.0));
        pairs
    }

    /// Returns true if no parameters have been added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Number of collected pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }
}

#[cfg(test)]
mod tests {
    use super::QueryParams;

    #[test]
    fn push_opt_skips_none() {
        let mut params = QueryParams::new();
        params.push_opt("groupId", Option::<String>::None);
        assert!(params.is_empty());
    }

    #[test]
    fn push_non_empty_skips_empty_text() {
        let mut params = QueryParams::new();
        params.push_non_empty("contractId", "");
        params.push_non_empty("groupId", "grp_1");
        assert_eq!(params.into_pairs(), vec![("groupId", "grp_1".to_string())]);
    }

    #[test]
    fn pairs_are_sorted_by_key() {
        let params = QueryParams::new()
            .with("groupId", "grp_1")
            .with("actions", true)
            .with("contractId", "ctr_1");

        assert_eq!(
            params.into_pairs(),
            vec![
                ("actions", "true".to_string()),
                ("contractId", "ctr_1".to_string()),
                ("groupId", "grp_1".to_string()),
            ]
        );
    }

    #[test]
    fn repeated_keys_keep_insertion_order() {
        let params = QueryParams::new()
            .with("tag", "b")
            .with("page", 1)
            .with("tag", "a");

        assert_eq!(
            params.into_pairs(),
            vec![
                ("page", "1".to_string()),
                ("tag", "b".to_string()),
                ("tag", "a".to_string()),
            ]
        );
    }
}
