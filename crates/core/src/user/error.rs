//! User onboarding errors.

use expensa_shared::types::UserId;
use thiserror::Error;

/// Errors that can occur while onboarding or looking up users.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserError {
    /// Onboarding input failed validation.
    #[error("Invalid user input: {field} {message}")]
    InvalidInput {
        /// The offending field.
        field: &'static str,
        /// What is wrong with it.
        message: String,
    },

    /// Another user already uses this email.
    #[error("Email {0} is already registered")]
    EmailTaken(String),

    /// User not found.
    #[error("User {0} not found")]
    NotFound(UserId),
}

impl UserError {
    pub(crate) fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            field,
            message: message.into(),
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidInput { .. } => 400,
            Self::NotFound(_) => 404,
            Self::EmailTaken(_) => 409,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidInput { .. } => "INVALID_USER_INPUT",
            Self::EmailTaken(_) => "EMAIL_TAKEN",
            Self::NotFound(_) => "USER_NOT_FOUND",
        }
    }
}
