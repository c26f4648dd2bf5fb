//! Typed error hierarchy for the prodtrack client.
//!
//! Three top-level enums cover the three subsystems:
//! - `ClientError`: request client and resource API failures
//! - `SessionError`: persisted session (token) store failures
//! - `ValidationError`: client-side payload rejection before a request is sent

use std::path::PathBuf;

use thiserror::Error;

/// Errors from the request client and every resource API wrapper.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Not authenticated: no access token in the session store")]
    Unauthenticated,

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Backend returned {status}: {message}")]
    Status {
        status: reqwest::StatusCode,
        message: String,
    },

    #[error("Failed to decode response from {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to encode request body for {path}: {source}")]
    Encode {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid request URL '{0}'")]
    InvalidUrl(String),

    #[error("Failed to read attachment {path}: {source}")]
    Attachment {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl ClientError {
    /// HTTP status of a backend rejection, if this error is one.
    pub fn status(&self) -> Option<reqwest::StatusCode> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            ClientError::Transport(e) => e.status(),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(reqwest::StatusCode::NOT_FOUND)
    }
}

/// Errors from the persisted session store.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Failed to read session file at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write session file at {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Session file at {path} is malformed: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("No config directory available for the session file")]
    NoConfigDir,
}

/// Client-side payload rejection, reported per field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Field '{field}' is required")]
    MissingField { field: String },

    #[error("Field '{field}' is invalid: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Payload must be a JSON object")]
    NotAnObject,
}

impl ValidationError {
    /// Name of the offending field, when the error is tied to one.
    pub fn field(&self) -> Option<&str> {
        match self {
            ValidationError::MissingField { field }
            | ValidationError::InvalidValue { field, .. } => Some(field),
            ValidationError::NotAnObject => None,
        }
    }
}
