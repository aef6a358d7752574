//! Core types for MiniShop.
//!
//! Type-safe wrappers for identifiers, e-mail addresses, user roles and money.

pub mod email;
pub mod id;
pub mod price;
pub mod role;

pub use email::{Email, EmailError};
pub use id::*;
pub use price::{Amount, CURRENCY_SUFFIX};
pub use role::{Role, UnknownRole};
