//! Form state for the console's create and edit screens.
//!
//! Each form keeps the raw strings the user typed so it can be re-rendered
//! unchanged. `validate()` either produces the plain record sent to the API
//! or a set of per-field messages; on failure no request is made.

pub mod auth;
pub mod client;
pub mod order;
pub mod password;
pub mod product;

use std::collections::BTreeMap;

pub use auth::{LoginForm, RegisterForm};
pub use client::ClientForm;
pub use order::{OrderAction, OrderForm, OrderLineForm};
pub use password::PasswordForm;
pub use product::ProductForm;

/// Message for an empty required field.
pub const REQUIRED: &str = "Ce champ est obligatoire.";

/// Validation messages keyed by form field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    /// No errors.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message for `field`. The first message for a field wins.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_insert_with(|| message.into());
    }

    /// Record [`REQUIRED`] for `field` when `value` is blank.
    ///
    /// Returns the trimmed value.
    pub fn require<'a>(&mut self, field: &str, value: &'a str) -> &'a str {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            self.add(field, REQUIRED);
        }
        trimmed
    }

    /// Message recorded for `field`, if any.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    /// Message recorded for `field` of the order line at `index`.
    #[must_use]
    pub fn line(&self, index: usize, field: &str) -> Option<&str> {
        self.get(&line_key(index, field))
    }

    /// Whether any message was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of fields with a message.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// `Ok(value)` when no message was recorded, `Err(self)` otherwise.
    ///
    /// # Errors
    ///
    /// Returns the collected messages when at least one field failed.
    pub fn into_result<T>(self, value: impl FnOnce() -> T) -> Result<T, Self> {
        if self.is_empty() { Ok(value()) } else { Err(self) }
    }
}

/// Field key for a per-line order field, e.g. `lines.0.quantity`.
#[must_use]
pub fn line_key(index: usize, field: &str) -> String {
    format!("lines.{index}.{field}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require() {
        let mut errors = FieldErrors::new();
        assert_eq!(errors.require("name", "  Rakoto "), "Rakoto");
        assert!(errors.is_empty());
        assert_eq!(errors.require("email", "   "), "");
        assert_eq!(errors.get("email"), Some(REQUIRED));
    }

    #[test]
    fn test_first_message_wins() {
        let mut errors = FieldErrors::new();
        errors.add("price", "first");
        errors.add("price", "second");
        assert_eq!(errors.get("price"), Some("first"));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_line_errors() {
        let mut errors = FieldErrors::new();
        errors.add(line_key(2, "quantity"), "bad");
        assert_eq!(errors.line(2, "quantity"), Some("bad"));
        assert_eq!(errors.line(1, "quantity"), None);
    }

    #[test]
    fn test_into_result() {
        assert_eq!(FieldErrors::new().into_result(|| 5), Ok(5));
        let mut errors = FieldErrors::new();
        errors.add("x", "y");
        assert!(errors.into_result(|| 5).is_err());
    }
}
