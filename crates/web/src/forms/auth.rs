//! Login and registration forms.
//!
//! Passwords are never echoed back when a form is re-rendered.

use minishop_core::{Email, Role};
use secrecy::SecretString;
use serde::Deserialize;

use crate::api::Registration;

use super::FieldErrors;

/// Login form data.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Validated login credentials.
#[derive(Debug)]
pub struct Credentials {
    pub username: String,
    pub password: SecretString,
}

impl LoginForm {
    /// Both fields are required.
    ///
    /// # Errors
    ///
    /// Returns the per-field messages when a field is blank.
    pub fn validate(&self) -> Result<Credentials, FieldErrors> {
        let mut errors = FieldErrors::new();
        let username = errors.require("username", &self.username).to_string();
        if self.password.is_empty() {
            errors.add("password", super::REQUIRED);
        }
        let password = &self.password;
        errors.into_result(|| Credentials {
            username,
            password: SecretString::from(password.clone()),
        })
    }
}

/// Registration form data.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RegisterForm {
    pub username: String,
    pub password: String,
    pub email: String,
    pub role: String,
}

impl Default for RegisterForm {
    fn default() -> Self {
        Self {
            username: String::new(),
            password: String::new(),
            email: String::new(),
            role: Role::default().code().to_string(),
        }
    }
}

impl RegisterForm {
    /// Username and password are required; e-mail is optional but must parse;
    /// role must be `admin` or `vendeur`.
    ///
    /// # Errors
    ///
    /// Returns the per-field messages for every invalid field.
    pub fn validate(&self) -> Result<Registration, FieldErrors> {
        let mut errors = FieldErrors::new();

        let username = errors.require("username", &self.username).to_string();
        if self.password.is_empty() {
            errors.add("password", super::REQUIRED);
        }

        let email = if self.email.trim().is_empty() {
            None
        } else {
            Email::parse(&self.email)
                .map_err(|_| errors.add("email", "Adresse e-mail invalide."))
                .ok()
        };

        let role = Role::parse(&self.role)
            .map_err(|_| errors.add("role", "Rôle invalide."))
            .ok();

        match role {
            Some(role) if errors.is_empty() => Ok(Registration {
                username,
                password: SecretString::from(self.password.clone()),
                email,
                role,
            }),
            _ => Err(errors),
        }
    }

    /// The form as re-rendered after a failure, without the password.
    #[must_use]
    pub fn without_password(&self) -> Self {
        Self {
            password: String::new(),
            ..self.clone()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::ExposeSecret;

    use super::*;
    use crate::forms::REQUIRED;

    #[test]
    fn test_login_requires_both_fields() {
        let errors = LoginForm::default().validate().unwrap_err();
        assert_eq!(errors.get("username"), Some(REQUIRED));
        assert_eq!(errors.get("password"), Some(REQUIRED));
    }

    #[test]
    fn test_login_keeps_password_verbatim() {
        let creds = LoginForm {
            username: " soa ".to_string(),
            password: " secret ".to_string(),
        }
        .validate()
        .unwrap();
        assert_eq!(creds.username, "soa");
        assert_eq!(creds.password.expose_secret(), " secret ");
    }

    #[test]
    fn test_register_defaults_to_seller() {
        let form = RegisterForm {
            username: "soa".to_string(),
            password: "pw".to_string(),
            ..RegisterForm::default()
        };
        let registration = form.validate().unwrap();
        assert_eq!(registration.role, Role::Seller);
        assert!(registration.email.is_none());
    }

    #[test]
    fn test_register_invalid_fields() {
        let form = RegisterForm {
            username: String::new(),
            password: "pw".to_string(),
            email: "nope".to_string(),
            role: "client".to_string(),
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.get("username"), Some(REQUIRED));
        assert_eq!(errors.get("email"), Some("Adresse e-mail invalide."));
        assert_eq!(errors.get("role"), Some("Rôle invalide."));
    }

    #[test]
    fn test_without_password() {
        let form = RegisterForm {
            username: "soa".to_string(),
            password: "pw".to_string(),
            ..RegisterForm::default()
        };
        let cleared = form.without_password();
        assert!(cleared.password.is_empty());
        assert_eq!(cleared.username, "soa");
    }
}
