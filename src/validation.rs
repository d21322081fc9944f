//! # Validation
//!
//! Form checks run before any auth request. The first failing check is reported, in this order:
//! - username present, then at least [`MIN_LENGTH`] characters
//! - password present, then at least [`MIN_LENGTH`] characters
//! - registration only: confirmation matches the password
use serde::Serialize;
use thiserror::Error;

pub const MIN_LENGTH: usize = 6;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Username is a required field")]
    MissingUsername,

    #[error("Username must be at least 6 characters")]
    ShortUsername,

    #[error("Password is a required field")]
    MissingPassword,

    #[error("Password must be at least 6 characters")]
    ShortPassword,

    #[error("Passwords do not match")]
    PasswordMismatch,
}

/// Body of `POST /auth/login` and `POST /auth/register`.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        check(&self.username, ValidationError::MissingUsername, ValidationError::ShortUsername)?;
        check(&self.password, ValidationError::MissingPassword, ValidationError::ShortPassword)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub credentials: Credentials,
    pub confirm_password: String,
}

impl Registration {
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        confirm_password: impl Into<String>,
    ) -> Self {
        Self {
            credentials: Credentials::new(username, password),
            confirm_password: confirm_password.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        self.credentials.validate()?;

        if self.credentials.password != self.confirm_password {
            return Err(ValidationError::PasswordMismatch);
        }

        Ok(())
    }
}

fn check(
    value: &str,
    missing: ValidationError,
    short: ValidationError,
) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(missing);
    }

    if value.chars().count() < MIN_LENGTH {
        return Err(short);
    }

    Ok(())
}
