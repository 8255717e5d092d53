//! Credentials submitted by the login and registration forms.
//!
//! These live only for the duration of one submission. Passwords are kept in
//! [`Secret`] so they stay out of `Debug` output and logs; they are exposed
//! only when the backend payload is built.

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::borrow::Cow;
use validator::{Validate, ValidationError};

use super::user::Role;

pub const MIN_PASSWORD_LENGTH: usize = 6;

// Password rules run at struct level: field-level rules would copy the
// value into the error params.
#[derive(Debug, Deserialize, Validate)]
#[validate(schema(function = "password_present", skip_on_field_errors = false))]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    pub password: Secret<String>,
}

impl LoginRequest {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: Secret::new(password.into()),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[validate(schema(function = "password_long_enough", skip_on_field_errors = false))]
pub struct RegisterRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    pub password: Secret<String>,

    /// Checked against `password` before anything else; never sent to the backend.
    #[serde(alias = "confirmPassword")]
    pub confirm_password: Secret<String>,

    #[validate(custom(function = "self_service_role"))]
    pub role: Role,
}

impl RegisterRequest {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
        confirm_password: impl Into<String>,
        role: Role,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            password: Secret::new(password.into()),
            confirm_password: Secret::new(confirm_password.into()),
            role,
        }
    }

    pub fn passwords_match(&self) -> bool {
        self.password.expose_secret() == self.confirm_password.expose_secret()
    }
}

fn validation_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}

fn password_present(login: &LoginRequest) -> Result<(), ValidationError> {
    if login.password.expose_secret().is_empty() {
        return Err(validation_error("required", "Password is required"));
    }
    Ok(())
}

fn password_long_enough(registration: &RegisterRequest) -> Result<(), ValidationError> {
    if registration.password.expose_secret().chars().count() < MIN_PASSWORD_LENGTH {
        return Err(validation_error(
            "length",
            "Password must be at least 6 characters",
        ));
    }
    Ok(())
}

fn self_service_role(role: &Role) -> Result<(), ValidationError> {
    if !role.is_self_service() {
        return Err(validation_error(
            "role",
            "Role must be OFFERER or SEEKER",
        ));
    }
    Ok(())
}

/// First human-readable message out of a set of field errors.
pub fn first_message(errors: &validator::ValidationErrors) -> String {
    errors
        .field_errors()
        .values()
        .flat_map(|errs| errs.iter())
        .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
        .unwrap_or_else(|| "Invalid input".to_string())
}
