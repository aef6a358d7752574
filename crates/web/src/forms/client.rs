//! Client create/edit form.

use minishop_core::Email;
use serde::Deserialize;

use crate::api::{Client, ClientInput};

use super::FieldErrors;

/// Raw client form fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClientForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
}

impl ClientForm {
    /// Pre-fill the edit form from a fetched client.
    #[must_use]
    pub fn from_client(client: &Client) -> Self {
        Self {
            name: client.name.clone(),
            email: client.email.clone(),
            phone: client.phone.clone(),
            address: client.address.clone(),
        }
    }

    /// Check required fields and the e-mail format.
    ///
    /// # Errors
    ///
    /// Returns the per-field messages when name or e-mail is missing or invalid.
    pub fn validate(&self) -> Result<ClientInput, FieldErrors> {
        let mut errors = FieldErrors::new();

        let name = errors.require("name", &self.name);
        let email = if errors.require("email", &self.email).is_empty() {
            None
        } else {
            match Email::parse(&self.email) {
                Ok(email) => Some(email),
                Err(e) => {
                    errors.add("email", capitalize(&e.to_string()));
                    None
                }
            }
        };

        match email {
            Some(email) if errors.is_empty() => Ok(ClientInput {
                name: name.to_string(),
                email,
                phone: self.phone.trim().to_string(),
                address: self.address.trim().to_string(),
            }),
            _ => Err(errors),
        }
    }
}

fn capitalize(message: &str) -> String {
    let mut chars = message.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect::<String>() + "."
    })
}
