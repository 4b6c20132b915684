//! Registration form state and validation.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

static PASSWORD_CHARSET_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9!@#$%^&*]{5,}$").expect("valid password regex"));

const PASSWORD_SPECIALS: &str = "!@#$%^&*";

/// First validation failure, in field order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationError {
    #[error("First name is required")]
    FirstNameRequired,
    #[error("Last name is required")]
    LastNameRequired,
    #[error("Please enter a valid email")]
    InvalidEmail,
    #[error("Password must be at least 5 characters, include a number and a special character")]
    WeakPassword,
    #[error("Passwords do not match")]
    PasswordMismatch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    FirstName,
    LastName,
    Email,
    Password,
    ConfirmPassword,
}

impl std::str::FromStr for Field {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "firstName" => Ok(Self::FirstName),
            "lastName" => Ok(Self::LastName),
            "email" => Ok(Self::Email),
            "password" => Ok(Self::Password),
            "confirmPassword" => Ok(Self::ConfirmPassword),
            _ => Err(format!("unknown field: {s}")),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl RegistrationForm {
    pub fn set_field(&mut self, field: Field, value: impl Into<String>) {
        let slot = match field {
            Field::FirstName => &mut self.first_name,
            Field::LastName => &mut self.last_name,
            Field::Email => &mut self.email,
            Field::Password => &mut self.password,
            Field::ConfirmPassword => &mut self.confirm_password,
        };
        *slot = value.into();
    }

    pub fn validate(&self) -> Result<(), RegistrationError> {
        if self.first_name.trim().is_empty() {
            return Err(RegistrationError::FirstNameRequired);
        }
        if self.last_name.trim().is_empty() {
            return Err(RegistrationError::LastNameRequired);
        }
        if !EMAIL_RE.is_match(&self.email) {
            return Err(RegistrationError::InvalidEmail);
        }
        if !is_strong_password(&self.password) {
            return Err(RegistrationError::WeakPassword);
        }
        if self.confirm_password != self.password {
            return Err(RegistrationError::PasswordMismatch);
        }
        Ok(())
    }
}

/// At least five allowed characters, one digit and one of `!@#$%^&*`.
fn is_strong_password(password: &str) -> bool {
    PASSWORD_CHARSET_RE.is_match(password)
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| PASSWORD_SPECIALS.contains(c))
}

// ============================================================================
// Form State
// ============================================================================

/// Editable form plus the last validation message.
#[derive(Debug, Clone, Default)]
pub struct FormState {
    values: RegistrationForm,
    error: Option<String>,
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn values(&self) -> &RegistrationForm {
        &self.values
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn handle_change(&mut self, field: Field, value: impl Into<String>) {
        self.values.set_field(field, value);
    }

    /// Validate and hand the values to `on_submit`.
    ///
    /// A successful submit resets every field; a failed one keeps them.
    pub fn submit<F>(&mut self, on_submit: F) -> Result<(), RegistrationError>
    where
        F: FnOnce(RegistrationForm),
    {
        match self.values.validate() {
            Ok(()) => {
                self.error = None;
                on_submit(std::mem::take(&mut self.values));
                Ok(())
            }
            Err(e) => {
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }
}
