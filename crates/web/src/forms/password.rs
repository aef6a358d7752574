//! Change-password form on the account page.

use secrecy::SecretString;
use serde::Deserialize;

use super::{FieldErrors, REQUIRED};

/// Change-password form data.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PasswordForm {
    pub old_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

/// Validated password change.
#[derive(Debug)]
pub struct PasswordChange {
    pub old_password: SecretString,
    pub new_password: SecretString,
}

impl PasswordForm {
    /// All three fields are required and the confirmation must match.
    ///
    /// # Errors
    ///
    /// Returns the per-field messages when a field is blank or the
    /// confirmation differs.
    pub fn validate(&self) -> Result<PasswordChange, FieldErrors> {
        let mut errors = FieldErrors::new();

        for (field, value) in [
            ("old_password", &self.old_password),
            ("new_password", &self.new_password),
            ("confirm_password", &self.confirm_password),
        ] {
            if value.is_empty() {
                errors.add(field, REQUIRED);
            }
        }

        if !self.confirm_password.is_empty() && self.confirm_password != self.new_password {
            errors.add(
                "confirm_password",
                "Les mots de passe ne correspondent pas.",
            );
        }

        errors.into_result(|| PasswordChange {
            old_password: SecretString::from(self.old_password.clone()),
            new_password: SecretString::from(self.new_password.clone()),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::ExposeSecret;

    use super::*;

    fn form(old: &str, new: &str, confirm: &str) -> PasswordForm {
        PasswordForm {
            old_password: old.to_string(),
            new_password: new.to_string(),
            confirm_password: confirm.to_string(),
        }
    }

    #[test]
    fn test_valid() {
        let change = form("ancien", "nouveau", "nouveau").validate().unwrap();
        assert_eq!(change.old_password.expose_secret(), "ancien");
        assert_eq!(change.new_password.expose_secret(), "nouveau");
    }

    #[test]
    fn test_required() {
        let errors = form("", "", "").validate().unwrap_err();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn test_mismatch() {
        let errors = form("ancien", "nouveau", "nouvo").validate().unwrap_err();
        assert_eq!(
            errors.get("confirm_password"),
            Some("Les mots de passe ne correspondent pas.")
        );
        assert_eq!(errors.get("new_password"), None);
    }
}
