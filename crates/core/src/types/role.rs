//! User roles.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Error returned for a role string the API does not know.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("rôle inconnu : {0:?}")]
pub struct UnknownRole(pub String);

/// Role of an application user.
///
/// On the wire the API uses the lowercase French codes `admin` and `vendeur`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Role {
    /// Shop administrator.
    #[serde(rename = "admin")]
    Admin,
    /// Merchant who sells products and places orders.
    #[default]
    #[serde(rename = "vendeur")]
    Seller,
}

impl Role {
    /// All roles, in the order offered on the registration form.
    pub const ALL: [Self; 2] = [Self::Seller, Self::Admin];

    /// Wire code sent to and received from the API.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Seller => "vendeur",
        }
    }

    /// Human readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Admin => "Administrateur",
            Self::Seller => "Commerçant",
        }
    }

    /// Parse a wire code, ignoring case and surrounding whitespace.
    ///
    /// Some API versions return the enum name (`VENDEUR`) rather than the value.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownRole`] for anything other than `admin` or `vendeur`.
    pub fn parse(s: &str) -> Result<Self, UnknownRole> {
        let code = s.trim();
        if code.eq_ignore_ascii_case("admin") {
            Ok(Self::Admin)
        } else if code.eq_ignore_ascii_case("vendeur") {
            Ok(Self::Seller)
        } else {
            Err(UnknownRole(s.to_owned()))
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_codes() {
        assert_eq!(Role::parse("admin").unwrap(), Role::Admin);
        assert_eq!(Role::parse("vendeur").unwrap(), Role::Seller);
        assert_eq!(Role::parse("VENDEUR").unwrap(), Role::Seller);
        assert_eq!(Role::parse(" Admin ").unwrap(), Role::Admin);
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(
            Role::parse("client"),
            Err(UnknownRole("client".to_string()))
        );
    }

    #[test]
    fn test_code_round_trip() {
        for role in Role::ALL {
            assert_eq!(Role::parse(role.code()).unwrap(), role);
        }
    }

    #[test]
    fn test_serde_uses_wire_codes() {
        assert_eq!(serde_json::to_string(&Role::Seller).unwrap(), "\"vendeur\"");
        let role: Role = serde_json::from_str("\"admin\"").unwrap();
        assert_eq!(role, Role::Admin);
    }

    #[test]
    fn test_default_is_seller() {
        assert_eq!(Role::default(), Role::Seller);
    }
}
