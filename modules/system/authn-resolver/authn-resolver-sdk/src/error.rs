//! Error types for token authentication.

use thiserror::Error;

/// Errors that can occur when authenticating a token.
#[derive(Debug, Error)]
pub enum AuthNResolverError {
    /// The token is invalid or malformed.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The authenticator cannot serve requests right now.
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),

    /// An internal error occurred.
    #[error("internal error: {0}")]
    Internal(String),
}
