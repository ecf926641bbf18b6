//! CLI error types and exit codes.

use rolecall_graph::GraphError;
use thiserror::Error;

/// Exit codes:
/// - 0: success
/// - 1: general error / not found
/// - 2: authentication error
/// - 3: network error
/// - 4: validation error
/// - 5: server error
pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Graph API error: {0}")]
    Server(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl CliError {
    /// Maps the error to its process exit code.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NotFound(_) | Self::Config(_) => 1,
            Self::Authentication(_) => 2,
            Self::Network(_) => 3,
            Self::Validation(_) => 4,
            Self::Server(_) => 5,
        }
    }

    /// Prints the error to stderr.
    pub fn print(&self) {
        eprintln!("Error: {self}");
    }
}

impl From<GraphError> for CliError {
    fn from(err: GraphError) -> Self {
        match err {
            GraphError::Validation(msg) => Self::Validation(msg),
            GraphError::NotFound(msg) => Self::NotFound(msg),
            GraphError::Auth(msg) => Self::Authentication(msg),
            GraphError::Config(msg) => Self::Config(msg),
            GraphError::Http(e) => Self::Network(e.to_string()),
            GraphError::Url(e) => Self::Network(e.to_string()),
            GraphError::MaxRetriesExceeded { .. } => Self::Network(err.to_string()),
            GraphError::GraphApi { .. } | GraphError::Json(_) => Self::Server(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        Self::Server(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(CliError::NotFound("x".into()).exit_code(), 1);
        assert_eq!(CliError::Authentication("x".into()).exit_code(), 2);
        assert_eq!(CliError::Network("x".into()).exit_code(), 3);
        assert_eq!(CliError::Validation("x".into()).exit_code(), 4);
        assert_eq!(CliError::Server("x".into()).exit_code(), 5);
    }

    #[test]
    fn test_graph_not_found_maps_to_exit_1() {
        let err: CliError = GraphError::NotFound("app registration not found".into()).into();
        assert_eq!(err.exit_code(), 1);
        assert!(err.to_string().contains("app registration not found"));
    }

    #[test]
    fn test_graph_validation_maps_to_exit_4() {
        let err: CliError = GraphError::Validation("bad guid".into()).into();
        assert_eq!(err.exit_code(), 4);
    }
}
