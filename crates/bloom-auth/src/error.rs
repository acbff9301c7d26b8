//! Authentication errors.

use bloom_commerce::FieldErrors;
use thiserror::Error;

/// Authentication error type.
#[derive(Error, Debug)]
pub enum AuthError {
    /// Client-side form validation failed.
    #[error("{0}")]
    InvalidForm(FieldErrors),

    /// Invalid credentials provided.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The server rejected the request.
    #[error("{message}")]
    Server {
        status: u16,
        message: String,
        /// Per-field messages, when the server sent them.
        field_errors: FieldErrors,
    },

    /// No stored session.
    #[error("session not found or expired")]
    SessionNotFound,

    /// Session expired.
    #[error("session expired")]
    SessionExpired,

    /// Reset token malformed.
    #[error("token invalid or expired")]
    InvalidToken,

    /// The one-time code is past its lifetime.
    #[error("OTP has expired. Please request a new one")]
    OtpExpired,

    /// Wrong one-time code.
    #[error("Invalid OTP. {remaining} attempts remaining")]
    OtpMismatch { remaining: u32 },

    /// Too many wrong codes.
    #[error("Too many failed attempts. Please request a new OTP")]
    OtpAttemptsExceeded,

    /// Resend requested inside the cooldown.
    #[error("Please wait {wait_secs} seconds before requesting a new OTP")]
    ResendTooSoon { wait_secs: i64 },

    /// Cache error.
    #[error("cache error: {0}")]
    Cache(#[from] bloom_cache::CacheError),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl AuthError {
    /// Check if this is an authentication failure.
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            AuthError::InvalidCredentials
                | AuthError::SessionNotFound
                | AuthError::SessionExpired
                | AuthError::InvalidToken
        ) || matches!(self, AuthError::Server { status: 401, .. })
    }

    /// Field-level messages to show next to inputs.
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            AuthError::InvalidForm(errors) => Some(errors),
            AuthError::Server { field_errors, .. } if !field_errors.is_empty() => {
                Some(field_errors)
            }
            _ => None,
        }
    }
}

impl From<bloom_commerce::FieldErrors> for AuthError {
    fn from(errors: FieldErrors) -> Self {
        AuthError::InvalidForm(errors)
    }
}

impl From<serde_json::Error> for AuthError {
    fn from(e: serde_json::Error) -> Self {
        AuthError::Serialization(e.to_string())
    }
}
