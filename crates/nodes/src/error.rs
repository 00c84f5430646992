//! Node-level error type.

use thiserror::Error;

/// Errors returned by a node's `execute` method.
///
/// The host uses the variant to decide how far a failure reaches:
/// - `Operation` and `Api` are scoped to the item being processed and may be
///   turned into an error item when continue-on-fail is enabled.
/// - `Credentials` aborts the whole invocation.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum NodeError {
    /// The node cannot carry out what its parameters ask for.
    #[error("{0}")]
    Operation(String),

    /// The remote service rejected the call or could not be reached.
    #[error("{message}")]
    Api {
        message: String,
        /// HTTP status or service error code, when one was reported.
        http_code: Option<u16>,
        /// Underlying cause, kept for the execution log.
        description: Option<String>,
    },

    /// The credentials the node requires were not supplied.
    #[error("{0}")]
    Credentials(String),
}

impl NodeError {
    /// `true` when the failure must abort the invocation regardless of
    /// continue-on-fail.
    pub fn is_fatal(&self) -> bool {
        matches!(self, NodeError::Credentials(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_credential_errors_are_fatal() {
        assert!(NodeError::Credentials("missing".into()).is_fatal());
        assert!(!NodeError::Operation("bad".into()).is_fatal());
        assert!(!NodeError::Api { message: "x".into(), http_code: None, description: None }.is_fatal());
    }

    #[test]
    fn api_error_displays_its_message() {
        let err = NodeError::Api {
            message: "datasheet not found".into(),
            http_code: Some(404),
            description: Some("HTTP 404".into()),
        };
        assert_eq!(err.to_string(), "datasheet not found");
    }
}
