//! Error types for control-plane access

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ControllerError {
    #[error("Request to {target} failed: {message}")]
    Transport { target: String, message: String },

    #[error("Cloud Controller returned {status} ({title}): {detail}")]
    Api {
        status: u16,
        code: Option<i64>,
        title: String,
        detail: String,
    },

    #[error("Unexpected response from {target}: {message}")]
    Decode { target: String, message: String },

    #[error("Invalid controller URL: {0}")]
    InvalidUrl(String),
}

impl ControllerError {
    /// HTTP status of an API-level rejection
    pub fn status(&self) -> Option<u16> {
        match self {
            ControllerError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns true if the controller rejected the credentials
    pub fn is_unauthorized(&self) -> bool {
        matches!(self.status(), Some(401) | Some(403))
    }
}

pub type ControllerResult<T> = Result<T, ControllerError>;
