//! MiniShop Core - shared domain types.
//!
//! Used by the `web` crate (server-rendered console) and by the integration tests.
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. Everything
//! that talks to the GraphQL API lives in the web crate.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for ids, e-mails, roles and amounts

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
