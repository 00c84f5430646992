//! Typed error type for the aitable crate.

use nodes::{HttpError, NodeError};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum AitableError {
    /// No `aitableApi` credential (or an empty token) was supplied.
    #[error("No credentials got returned!")]
    MissingCredentials,

    #[error("The resource \"{0}\" is not supported!")]
    UnsupportedResource(String),

    #[error("The operation \"{operation}\" is not supported!")]
    UnsupportedOperation { resource: String, operation: String },

    #[error("Parameter \"{name}\" is required")]
    MissingParameter { name: String },

    #[error("Parameter \"{name}\" is invalid: {reason}")]
    InvalidParameter { name: String, reason: String },

    /// The API answered but flagged the call as failed in its body.
    #[error("Aitable API error: {message}")]
    Api { message: String, code: Option<u16> },

    /// The request did not produce a usable response.
    #[error("Aitable request failed: {message}")]
    Transport {
        message: String,
        status: Option<u16>,
        #[source]
        source: HttpError,
    },

    #[error("Error loading fields: {0}")]
    OptionLoad(String),
}

impl AitableError {
    pub(crate) fn invalid(name: &str, reason: impl Into<String>) -> Self {
        AitableError::InvalidParameter { name: name.to_owned(), reason: reason.into() }
    }

    pub(crate) fn missing(name: &str) -> Self {
        AitableError::MissingParameter { name: name.to_owned() }
    }
}

impl From<AitableError> for NodeError {
    fn from(err: AitableError) -> Self {
        let message = err.to_string();
        match err {
            AitableError::MissingCredentials => NodeError::Credentials(message),
            AitableError::Api { code, .. } => NodeError::Api {
                message,
                http_code: code,
                description: None,
            },
            AitableError::Transport { status, source, .. } => NodeError::Api {
                message,
                http_code: status,
                description: Some(source.to_string()),
            },
            AitableError::UnsupportedResource(_)
            | AitableError::UnsupportedOperation { .. }
            | AitableError::MissingParameter { .. }
            | AitableError::InvalidParameter { .. }
            | AitableError::OptionLoad(_) => NodeError::Operation(message),
        }
    }
}
