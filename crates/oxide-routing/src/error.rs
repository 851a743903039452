//! Error types for routing and dispatch.

use thiserror::Error;

/// Errors raised while registering routes, resolving requests, generating
/// URLs or dispatching to a controller.
#[derive(Debug, Error)]
pub enum RouterError {
    /// The request cannot be served: no route or convention match, unknown
    /// controller, or a controller without the requested action.
    #[error("not found: {0}")]
    NotFound(String),

    /// A route was declared with missing or inconsistent parameters.
    #[error("bad route definition: {0}")]
    BadRouteDefinition(String),

    /// URL generation was given unusable parameters.
    #[error("bad parameter: {0}")]
    BadParameter(String),

    /// No registered route matches the parameters given to URL generation.
    #[error("route not found: {0}")]
    RouteNotFound(String),

    /// A controller broke the dispatch contract.
    #[error("dispatch contract violation: {0}")]
    DispatchContractViolation(String),

    /// Invalid path pattern.
    #[error("invalid path pattern: {0}")]
    InvalidPattern(String),

    /// The routing configuration could not be read or understood.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The transport failed to send the response.
    #[error("transport error: {0}")]
    Transport(#[from] std::io::Error),
}

impl RouterError {
    /// HTTP status code the transport layer should answer with.
    pub fn status(&self) -> u16 {
        match self {
            Self::NotFound(_) | Self::RouteNotFound(_) => 404,
            Self::BadParameter(_) => 400,
            Self::BadRouteDefinition(_)
            | Self::DispatchContractViolation(_)
            | Self::InvalidPattern(_)
            | Self::Config(_)
            | Self::Transport(_) => 500,
        }
    }
}

/// Result type alias for router operations.
pub type Result<T> = std::result::Result<T, RouterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(RouterError::NotFound("x".into()).status(), 404);
        assert_eq!(RouterError::RouteNotFound("x".into()).status(), 404);
        assert_eq!(RouterError::BadParameter("x".into()).status(), 400);
        assert_eq!(
            RouterError::DispatchContractViolation("x".into()).status(),
            500
        );
    }

    #[test]
    fn test_io_error_converts() {
        let err: RouterError = std::io::Error::other("broken pipe").into();
        assert!(matches!(err, RouterError::Transport(_)));
        assert_eq!(err.to_string(), "transport error: broken pipe");
    }
}
