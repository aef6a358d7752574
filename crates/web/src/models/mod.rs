//! Session models for the console.

pub mod session;

pub use session::{CurrentUser, keys as session_keys};
