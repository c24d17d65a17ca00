//! Declarative request validation.
//!
//! Request types implement [`Validate`] by describing their field rules with
//! a [`Rules`] builder. Every rule is evaluated, so a single pass reports all
//! violated fields instead of stopping at the first one. Nested request
//! bodies validate themselves and their violations are re-keyed under the
//! parent field (`property.product_id`, `body[1].ui_identity_id`).

use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Message reported by [`Rules::required`].
pub const MSG_REQUIRED: &str = "cannot be blank";
/// Message reported by [`Rules::non_zero`].
pub const MSG_NON_ZERO: &str = "cannot be zero";

/// Capability implemented by every request type sent through the pipeline.
pub trait Validate {
    /// Check the value against its declared rules.
    ///
    /// # Errors
    ///
    /// Returns every violated field when at least one rule fails.
    fn validate(&self) -> Result<(), ValidationErrors>;
}

impl<T: Validate + ?Sized> Validate for &T {
    fn validate(&self) -> Result<(), ValidationErrors> {
        (**self).validate()
    }
}

/// Field-keyed validation failures, ordered by field path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    fields: BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
    /// Create an empty set of violations.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a violation for a field.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.fields
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    /// Returns true when no violations have been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Number of violated fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Messages recorded for a field path, if any.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.fields.get(field).map(Vec::as_slice)
    }

    /// Returns true when the field path has at least one violation.
    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Violated field paths in order.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Iterate over field paths and their messages.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.fields
            .iter()
            .map(|(field, messages)| (field.as_str(), messages.as_slice()))
    }

    /// `Ok(())` when empty, otherwise `Err(self)`.
    ///
    /// # Errors
    ///
    /// Returns `self` if any violation was recorded.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }

    fn absorb(&mut self, prefix: &str, nested: Self) {
        for (field, messages) in nested.fields {
            let key = if field.starts_with('[') {
                format!("{prefix}{field}")
            } else {
                format!("{prefix}.{field}")
            };
            self.fields.entry(key).or_default().extend(messages);
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.fields {
            if !first {
                f.write_str("; ")?;
            }
            first = false;
            write!(f, "{field}: {}", messages.join(", "))?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Values that can be checked for presence by [`Rules::required`].
pub trait Required {
    /// Returns true when the value counts as missing.
    fn is_blank(&self) -> bool;
}

impl Required for str {
    fn is_blank(&self) -> bool {
        self.trim().is_empty()
    }
}

impl Required for String {
    fn is_blank(&self) -> bool {
        self.as_str().is_blank()
    }
}

impl<T> Required for [T] {
    fn is_blank(&self) -> bool {
        self.is_empty()
    }
}

impl<T> Required for Vec<T> {
    fn is_blank(&self) -> bool {
        self.is_empty()
    }
}

impl<K, V> Required for HashMap<K, V> {
    fn is_blank(&self) -> bool {
        self.is_empty()
    }
}

impl<T> Required for Option<T> {
    fn is_blank(&self) -> bool {
        self.is_none()
    }
}

impl<T: Required + ?Sized> Required for &T {
    fn is_blank(&self) -> bool {
        (**self).is_blank()
    }
}

macro_rules! required_integer {
    ($($ty:ty),*) => {
        $(
            impl Required for $ty {
                fn is_blank(&self) -> bool {
                    *self == 0
                }
            }
        )*
    };
}

required_integer!(i32, i64, u32, u64, usize);

/// Builder collecting violations for one value.
#[derive(Debug, Default)]
#[must_use]
pub struct Rules {
    errors: ValidationErrors,
}

impl Rules {
    /// Start an empty rule set.
    pub fn new() -> Self {
        Self::default()
    }

    /// The value must be present: non-blank text, non-empty collection,
    /// `Some`, or a non-zero integer.
    pub fn required<T: Required + ?Sized>(mut self, field: &str, value: &T) -> Self {
        if value.is_blank() {
            self.errors.add(field, MSG_REQUIRED);
        }
        self
    }

    /// The value must differ from its type's zero value.
    pub fn non_zero<T: Default + PartialEq>(mut self, field: &str, value: T) -> Self {
        if value == T::default() {
            self.errors.add(field, MSG_NON_ZERO);
        }
        self
    }

    /// When present, the value must be one of `allowed`.
    pub fn one_of(mut self, field: &str, value: Option<&str>, allowed: &[&str]) -> Self {
        if let Some(value) = value {
            if !value.is_empty() && !allowed.contains(&value) {
                self.errors
                    .add(field, format!("must be one of: {}", allowed.join(", ")));
            }
        }
        self
    }

    /// When present, the text must not exceed `max` characters.
    pub fn max_len(mut self, field: &str, value: Option<&str>, max: usize) -> Self {
        if let Some(value) = value {
            if value.chars().count() > max {
                self.errors
                    .add(field, format!("the length must be no more than {max}"));
            }
        }
        self
    }

    /// When present, the value must be at least `min`.
    pub fn min_value<T: PartialOrd + fmt::Display>(
        mut self,
        field: &str,
        value: Option<T>,
        min: T,
    ) -> Self {
        if let Some(value) = value {
            if value < min {
                self.errors.add(field, format!("must be no less than {min}"));
            }
        }
        self
    }

    /// Record `message` unless `ok` holds.
    pub fn check(mut self, field: &str, ok: bool, message: impl Into<String>) -> Self {
        if !ok {
            self.errors.add(field, message);
        }
        self
    }

    /// Validate a nested value, keying its violations under `field`.
    pub fn nested<V: Validate + ?Sized>(mut self, field: &str, value: &V) -> Self {
        if let Err(nested) = value.validate() {
            self.errors.absorb(field, nested);
        }
        self
    }

    /// Validate a nested value when present.
    pub fn nested_opt<V: Validate>(self, field: &str, value: Option<&V>) -> Self {
        match value {
            Some(value) => self.nested(field, value),
            None => self,
        }
    }

    /// Validate every element, keying violations as `field[index]`.
    pub fn each<V: Validate>(mut self, field: &str, values: &[V]) -> Self {
        for (index, value) in values.iter().enumerate() {
            if let Err(nested) = value.validate() {
                self.errors.absorb(&format!("{field}[{index}]"), nested);
            }
        }
        self
    }

    /// Finish the rule set.
    ///
    /// # Errors
    ///
    /// Returns the collected violations when any rule failed.
    pub fn finish(self) -> Result<(), ValidationErrors> {
        self.errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Item {
        id: String,
    }

    impl Validate for Item {
        fn validate(&self) -> Result<(), ValidationErrors> {
            Rules::new().required("id", &self.id).finish()
        }
    }

    struct Body {
        name: String,
        version: i64,
        kind: Option<String>,
        items: Vec<Item>,
        origin: Option<Item>,
    }

    impl Validate for Body {
        fn validate(&self) -> Result<(), ValidationErrors> {
            Rules::new()
                .required("name", &self.name)
                .non_zero("version", self.version)
                .one_of("kind", self.kind.as_deref(), &["alpha", "beta"])
                .required("items", &self.items)
                .each("items", &self.items)
                .nested_opt("origin", self.origin.as_ref())
                .finish()
        }
    }

    struct Outer {
        body: Body,
    }

    impl Validate for Outer {
        fn validate(&self) -> Result<(), ValidationErrors> {
            Rules::new().nested("body", &self.body).finish()
        }
    }

    fn valid_body() -> Body {
        Body {
            name: "www.example.com".into(),
            version: 3,
            kind: Some("alpha".into()),
            items: vec![Item { id: "a".into() }],
            origin: None,
        }
    }

    #[test]
    fn valid_value_passes() {
        assert!(valid_body().validate().is_ok());
    }

    #[test]
    fn reports_all_violations_in_one_pass() {
        let body = Body {
            name: "   ".into(),
            version: 0,
            kind: Some("gamma".into()),
            items: vec![],
            origin: None,
        };

        let errors = body.validate().unwrap_err();
        assert_eq!(errors.len(), 4);
        assert_eq!(errors.get("name"), Some(&[MSG_REQUIRED.to_string()][..]));
        assert_eq!(errors.get("version"), Some(&[MSG_NON_ZERO.to_string()][..]));
        assert_eq!(
            errors.get("kind"),
            Some(&["must be one of: alpha, beta".to_string()][..])
        );
        assert!(errors.contains("items"));
    }

    #[test]
    fn one_of_skips_absent_value() {
        let body = Body {
            kind: None,
            ..valid_body()
        };
        assert!(body.validate().is_ok());
    }

    #[test]
    fn nested_violations_are_prefixed() {
        let outer = Outer {
            body: Body {
                items: vec![Item { id: "ok".into() }, Item { id: String::new() }],
                origin: Some(Item { id: String::new() }),
                ..valid_body()
            },
        };

        let errors = outer.validate().unwrap_err();
        let fields: Vec<&str> = errors.fields().collect();
        assert_eq!(fields, vec!["body.items[1].id", "body.origin.id"]);
    }

    #[test]
    fn length_and_minimum_rules() {
        let result = Rules::new()
            .max_len("name", Some("abcdef"), 5)
            .max_len("absent", None, 1)
            .min_value("size", Some(5), 10)
            .min_value("page", Some(0), 0)
            .check("pattern", false, "must match")
            .finish();

        let errors = result.unwrap_err();
        assert_eq!(
            errors.get("name"),
            Some(&["the length must be no more than 5".to_string()][..])
        );
        assert_eq!(
            errors.get("size"),
            Some(&["must be no less than 10".to_string()][..])
        );
        assert!(errors.contains("pattern"));
        assert!(!errors.contains("page"));
        assert!(!errors.contains("absent"));
    }

    #[test]
    fn display_joins_fields() {
        let mut errors = ValidationErrors::new();
        errors.add("group_id", MSG_REQUIRED);
        errors.add("contract_id", MSG_REQUIRED);
        errors.add("contract_id", "must start with ctr_");

        assert_eq!(
            errors.to_string(),
            "contract_id: cannot be blank, must start with ctr_; group_id: cannot be blank"
        );
    }

    #[test]
    fn empty_errors_convert_to_ok() {
        assert!(ValidationErrors::new().into_result().is_ok());
        assert!(Rules::new().finish().is_ok());
    }

    #[test]
    fn required_covers_options_and_integers() {
        let errors = Rules::new()
            .required("opt", &Option::<String>::None)
            .required("zero", &0_i64)
            .required("set", &Some(1))
            .finish()
            .unwrap_err();
        assert!(errors.contains("opt"));
        assert!(errors.contains("zero"));
        assert!(!errors.contains("set"));
    }
}
