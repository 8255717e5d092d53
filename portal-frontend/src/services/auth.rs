//! Login, registration and logout against the marketplace backend.
//!
//! Transport failures never reach callers raw: every exchange ends in an
//! [`AuthOutcome`] or one of the few [`AuthError`] kinds the UI can word.

use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use super::api_client::{ApiClient, ApiError};
use super::metrics::record_auth_attempt;
use crate::models::credentials::first_message;
use crate::models::{LoginRequest, RegisterRequest, User};
use crate::session::SessionStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthOperation {
    Login,
    Register,
}

impl AuthOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthOperation::Login => "login",
            AuthOperation::Register => "register",
        }
    }

    fn failure_message(&self) -> &'static str {
        match self {
            AuthOperation::Login => "Login failed. Please try again.",
            AuthOperation::Register => "Registration failed. Please try again.",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AuthOutcome {
    Authenticated(User),
    /// The backend answered without an identity, e.g. wrong credentials.
    NoIdentity,
}

impl AuthOutcome {
    fn label(&self) -> &'static str {
        match self {
            AuthOutcome::Authenticated(_) => "authenticated",
            AuthOutcome::NoIdentity => "no_identity",
        }
    }

    /// Message shown when no identity came back.
    pub fn rejection_message(operation: AuthOperation) -> &'static str {
        match operation {
            // Same wording for unknown email and wrong password.
            AuthOperation::Login => "Invalid email or password",
            AuthOperation::Register => operation.failure_message(),
        }
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Authentication backend unavailable: {0}")]
    Unavailable(#[source] ApiError),

    #[error("Backend returned a malformed identity: {0}")]
    MalformedIdentity(#[source] serde_json::Error),
}

impl AuthError {
    fn label(&self) -> &'static str {
        match self {
            AuthError::PasswordMismatch => "password_mismatch",
            AuthError::Validation(_) => "invalid",
            AuthError::Unavailable(_) => "unavailable",
            AuthError::MalformedIdentity(_) => "malformed_identity",
        }
    }

    /// Whether the form itself was wrong (as opposed to the exchange failing).
    pub fn is_user_error(&self) -> bool {
        matches!(self, AuthError::PasswordMismatch | AuthError::Validation(_))
    }

    pub fn user_message(&self, operation: AuthOperation) -> String {
        match self {
            AuthError::PasswordMismatch => "Passwords do not match".to_string(),
            AuthError::Validation(errors) => first_message(errors),
            AuthError::Unavailable(_) | AuthError::MalformedIdentity(_) => {
                operation.failure_message().to_string()
            }
        }
    }
}

/// Reads an identity out of a login or registration answer.
///
/// A body without a usable `id` is not an identity; a body with one must be
/// a complete `User`. Zero, `false` and the empty string are not usable ids.
pub fn identity_from_body(body: Value) -> Result<Option<User>, serde_json::Error> {
    if !has_usable_id(&body) {
        return Ok(None);
    }
    serde_json::from_value(body).map(Some)
}

fn has_usable_id(body: &Value) -> bool {
    match body.get("id") {
        None | Some(Value::Null) | Some(Value::Bool(false)) => false,
        Some(Value::Number(n)) => n.as_f64() != Some(0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(_) => true,
    }
}

pub struct AuthService {
    api: Arc<ApiClient>,
    sessions: Arc<SessionStore>,
}

impl AuthService {
    pub fn new(api: Arc<ApiClient>, sessions: Arc<SessionStore>) -> Self {
        Self { api, sessions }
    }

    pub async fn login(&self, credentials: &LoginRequest) -> Result<AuthOutcome, AuthError> {
        let operation = AuthOperation::Login;
        let result = match credentials.validate() {
            Ok(()) => interpret(self.api.login(credentials).await),
            Err(errors) => Err(AuthError::Validation(errors)),
        };
        self.finish(operation, &credentials.email, result)
    }

    /// Mismatched confirmation blocks the call before any validation or network traffic.
    pub async fn register(&self, registration: &RegisterRequest) -> Result<AuthOutcome, AuthError> {
        let operation = AuthOperation::Register;
        let result = if !registration.passwords_match() {
            Err(AuthError::PasswordMismatch)
        } else {
            match registration.validate() {
                Ok(()) => interpret(self.api.register(registration).await),
                Err(errors) => Err(AuthError::Validation(errors)),
            }
        };
        self.finish(operation, &registration.email, result)
    }

    pub fn logout(&self) {
        self.sessions.clear();
    }

    fn finish(
        &self,
        operation: AuthOperation,
        email: &str,
        result: Result<AuthOutcome, AuthError>,
    ) -> Result<AuthOutcome, AuthError> {
        match &result {
            Ok(AuthOutcome::Authenticated(user)) => {
                tracing::info!(
                    operation = operation.as_str(),
                    user_id = user.id,
                    role = %user.role,
                    "Authentication succeeded"
                );
                self.sessions.set_current(user.clone());
            }
            Ok(AuthOutcome::NoIdentity) => {
                tracing::info!(operation = operation.as_str(), email = %email, "Backend returned no identity");
            }
            Err(e) if e.is_user_error() => {
                tracing::debug!(operation = operation.as_str(), reason = %e, "Submission rejected locally");
            }
            Err(e) => {
                tracing::error!(operation = operation.as_str(), error = %e, "Authentication exchange failed");
            }
        }

        let label = match &result {
            Ok(outcome) => outcome.label(),
            Err(e) => e.label(),
        };
        record_auth_attempt(operation.as_str(), label);

        result
    }
}

fn interpret(response: Result<Value, ApiError>) -> Result<AuthOutcome, AuthError> {
    match response {
        Ok(body) => match identity_from_body(body) {
            Ok(Some(user)) => Ok(AuthOutcome::Authenticated(user)),
            Ok(None) => Ok(AuthOutcome::NoIdentity),
            Err(e) => Err(AuthError::MalformedIdentity(e)),
        },
        // The backend answers bad credentials with a 4xx and a text body.
        Err(e) if e.is_client_error() => Ok(AuthOutcome::NoIdentity),
        Err(e) => Err(AuthError::Unavailable(e)),
    }
}
