//! Newtype IDs for type-safe entity references.
//!
//! The API exposes identifiers as GraphQL `ID` strings holding database integers.
//! `define_id!` wraps them so a client id can never be passed where a product id
//! is expected.

use core::num::ParseIntError;

/// Error returned when a wire identifier is not a valid integer id.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {kind} id {value:?}: {source}")]
pub struct IdParseError {
    /// Name of the id type that failed to parse.
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
    #[source]
    source: ParseIntError,
}

impl IdParseError {
    /// Build an error for `kind` from the rejected `value`.
    #[must_use]
    pub fn new(kind: &'static str, value: &str, source: ParseIntError) -> Self {
        Self {
            kind,
            value: value.to_owned(),
            source,
        }
    }
}

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around `i64` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - `FromStr` accepting the API's decimal string form (surrounding whitespace ignored)
/// - `Display` printing the bare integer, which is also the form sent back to the API
///
/// # Example
///
/// ```rust
/// # use minishop_core::define_id;
/// define_id!(InvoiceId, "invoice");
///
/// let id: InvoiceId = "42".parse().unwrap();
/// assert_eq!(id.to_string(), "42");
/// assert!("abc".parse::<InvoiceId>().is_err());
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident, $kind:literal) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Create a new ID from an integer value.
            #[must_use]
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            /// Get the underlying integer value.
            #[must_use]
            pub const fn as_i64(&self) -> i64 {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = $crate::IdParseError;

            fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
                s.trim()
                    .parse::<i64>()
                    .map(Self)
                    .map_err(|e| $crate::IdParseError::new($kind, s, e))
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id!(UserId, "user");
define_id!(ClientId, "client");
define_id!(ProductId, "product");
define_id!(OrderId, "order");
define_id!(OrderLineId, "order line");

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_wire_id() {
        let id: ClientId = "17".parse().unwrap();
        assert_eq!(id, ClientId::new(17));
        assert_eq!(id.to_string(), "17");
    }

    #[test]
    fn test_parse_ignores_surrounding_whitespace() {
        let id: ProductId = " 3 ".parse().unwrap();
        assert_eq!(id.as_i64(), 3);
    }

    #[test]
    fn test_parse_rejects_non_numeric() {
        let err = "UHJvZHVpdDox".parse::<ProductId>().unwrap_err();
        assert_eq!(err.kind, "product");
        assert!(err.to_string().starts_with("invalid product id \"UHJvZHVpdDox\""));
    }

    #[test]
    fn test_serde_is_transparent() {
        let json = serde_json::to_string(&OrderId::new(5)).unwrap();
        assert_eq!(json, "5");
        let back: OrderId = serde_json::from_str("5").unwrap();
        assert_eq!(back, OrderId::new(5));
    }

    #[test]
    fn test_i64_round_trip() {
        let raw: i64 = UserId::from(9).into();
        assert_eq!(raw, 9);
    }
}
