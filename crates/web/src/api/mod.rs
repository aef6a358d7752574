//! Shop GraphQL API client.
//!
//! # Architecture
//!
//! - Uses `graphql-client` derives for type-safe queries checked against
//!   `graphql/schema.graphql`
//! - Requests are sent with `reqwest`; the session token travels as
//!   `Authorization: JWT <token>`
//! - The API is the source of truth; list and aggregate queries are cached
//!   with `moka` and the whole cache is dropped after every mutation
//!
//! # Example
//!
//! ```rust,ignore
//! use minishop_web::api::ApiClient;
//!
//! let api = ApiClient::new(&config.api)?;
//! let token = api.token_auth("rakoto", &password).await?;
//! let clients = api.clients(&token).await?;
//! ```

mod cache;
mod client;
mod conversions;
pub mod queries;
pub mod types;

pub use client::ApiClient;
pub use types::*;

use thiserror::Error;

/// Errors that can occur when talking to the shop API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// GraphQL query returned errors.
    #[error("GraphQL errors: {}", format_graphql_errors(.0))]
    GraphQL(Vec<GraphQLError>),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The response parsed but a value did not fit the domain type.
    #[error("Decode error: {0}")]
    Decode(String),
}

impl ApiError {
    pub(crate) fn single(message: impl Into<String>) -> Self {
        Self::GraphQL(vec![GraphQLError {
            message: message.into(),
            locations: vec![],
            path: vec![],
        }])
    }

    /// Message shown to the user next to the form or list that failed.
    ///
    /// Server-side rejections are shown verbatim; transport problems get a
    /// short French sentence instead of the internal error chain.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::GraphQL(errors) => {
                let messages: Vec<&str> = errors
                    .iter()
                    .map(|e| e.message.as_str())
                    .filter(|m| !m.is_empty())
                    .collect();
                if messages.is_empty() {
                    "Le serveur a renvoyé une erreur.".to_string()
                } else {
                    messages.join(" ; ")
                }
            }
            Self::Http(e) if e.is_timeout() => "Le serveur ne répond pas.".to_string(),
            Self::Http(_) => "Impossible de joindre le serveur.".to_string(),
            Self::Parse(_) | Self::Decode(_) => "Réponse invalide du serveur.".to_string(),
        }
    }
}

/// A GraphQL error returned by the shop API.
#[derive(Debug, Clone)]
pub struct GraphQLError {
    /// Error message.
    pub message: String,
    /// Source locations in the query.
    pub locations: Vec<GraphQLErrorLocation>,
    /// Path to the error in the response.
    pub path: Vec<serde_json::Value>,
}

/// Location in a GraphQL query where an error occurred.
#[derive(Debug, Clone)]
pub struct GraphQLErrorLocation {
    /// Line number (1-indexed).
    pub line: i64,
    /// Column number (1-indexed).
    pub column: i64,
}

fn format_graphql_errors(errors: &[GraphQLError]) -> String {
    if errors.is_empty() {
        return "(no error details provided)".to_string();
    }

    errors
        .iter()
        .enumerate()
        .map(|(i, e)| {
            let mut parts = Vec::new();

            if !e.message.is_empty() {
                parts.push(e.message.clone());
            }

            if !e.path.is_empty() {
                let path_str = e
                    .path
                    .iter()
                    .map(|p| match p {
                        serde_json::Value::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .collect::<Vec<_>>()
                    .join(".");
                parts.push(format!("path: {path_str}"));
            }

            if let Some(loc) = e.locations.first() {
                parts.push(format!("at line {}:{}", loc.line, loc.column));
            }

            if parts.is_empty() {
                format!("[error {}]: (no details)", i + 1)
            } else {
                parts.join(" ")
            }
        })
        .collect::<Vec<_>>()
        .join("; ")
}
