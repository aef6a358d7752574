//! E-mail address type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing an [`Email`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EmailError {
    /// The input is empty (after trimming).
    #[error("l'adresse e-mail est vide")]
    Empty,
    /// The input is longer than [`Email::MAX_LENGTH`].
    #[error("l'adresse e-mail dépasse {max} caractères")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input does not contain exactly one `@`.
    #[error("l'adresse e-mail doit contenir un seul @")]
    AtSymbol,
    /// Nothing before the `@`.
    #[error("la partie locale de l'adresse e-mail est vide")]
    EmptyLocalPart,
    /// Nothing after the `@`, or the domain contains whitespace.
    #[error("le domaine de l'adresse e-mail est invalide")]
    InvalidDomain,
}

/// An e-mail address as accepted by the shop API.
///
/// Only the structure is checked: one `@`, a non-empty local part and a
/// non-empty, whitespace-free domain. Surrounding whitespace is trimmed.
///
/// ```
/// use minishop_core::Email;
///
/// assert!(Email::parse("rakoto@example.mg").is_ok());
/// assert!(Email::parse("  rakoto@example.mg ").is_ok());
/// assert!(Email::parse("rakoto").is_err());
/// assert!(Email::parse("a@b@c").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// Maximum length of an e-mail address (RFC 5321).
    pub const MAX_LENGTH: usize = 254;

    /// Parse an `Email` from user input.
    ///
    /// # Errors
    ///
    /// Returns an [`EmailError`] describing the first structural problem found.
    pub fn parse(input: &str) -> Result<Self, EmailError> {
        let s = input.trim();
        if s.is_empty() {
            return Err(EmailError::Empty);
        }
        if s.len() > Self::MAX_LENGTH {
            return Err(EmailError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        let (local, domain) = s.split_once('@').ok_or(EmailError::AtSymbol)?;
        if domain.contains('@') {
            return Err(EmailError::AtSymbol);
        }
        if local.is_empty() {
            return Err(EmailError::EmptyLocalPart);
        }
        if domain.is_empty() || domain.chars().any(char::is_whitespace) {
            return Err(EmailError::InvalidDomain);
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `Email` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Email {
    type Err = EmailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
