//! Error taxonomy of the credential service and its HTTP mapping

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use common::error::DatabaseError;
use serde_json::json;
use std::fmt;
use thiserror::Error;

use crate::password::HashingError;

/// Failures returned by [`crate::service::CredentialService`]
#[derive(Error, Debug)]
pub enum CredentialError {
    /// Missing or empty input, never retried
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The username is already registered
    #[error("Username already exists")]
    DuplicateUser,

    /// Unknown user or wrong password; the two are deliberately identical
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Storage failure
    #[error("Storage error: {0}")]
    Storage(#[from] DatabaseError),

    /// Hash engine failure, tagged with the step that failed
    #[error("Hashing error during {stage}: {source}")]
    Hashing {
        stage: HashingStage,
        #[source]
        source: HashingError,
    },
}

/// Which use of the hash engine failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashingStage {
    /// Producing the hash of a new password
    Hash,
    /// Checking a submitted password against a stored hash
    Verify,
}

impl fmt::Display for HashingStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HashingStage::Hash => f.write_str("hashing"),
            HashingStage::Verify => f.write_str("verification"),
        }
    }
}

impl CredentialError {
    /// HTTP status for this error
    pub fn status(&self) -> StatusCode {
        match self {
            CredentialError::InvalidInput(_) | CredentialError::DuplicateUser => {
                StatusCode::BAD_REQUEST
            }
            CredentialError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            CredentialError::Storage(_) | CredentialError::Hashing { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message shown to callers. Infrastructure detail stays in the logs.
    pub fn public_message(&self) -> &'static str {
        match self {
            CredentialError::InvalidInput(_) => "Username and password are required",
            CredentialError::DuplicateUser => "Username already exists",
            CredentialError::InvalidCredentials => "Invalid credentials",
            CredentialError::Storage(_) => "Database error",
            CredentialError::Hashing {
                stage: HashingStage::Hash,
                ..
            } => "Password hashing failed",
            CredentialError::Hashing {
                stage: HashingStage::Verify,
                ..
            } => "Authentication failed",
        }
    }
}

impl IntoResponse for CredentialError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": self.public_message(),
        }));

        (self.status(), body).into_response()
    }
}

/// Type alias for credential service results
pub type CredentialResult<T> = Result<T, CredentialError>;
