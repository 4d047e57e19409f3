//! Public API trait for token authentication.

use async_trait::async_trait;

use crate::error::AuthNResolverError;
use crate::models::AuthenticationResult;

/// Validates raw bearer tokens.
///
/// Implementations verify the credential and build an
/// [`IdentityContext`](taskhub_security::IdentityContext) from it. They do
/// not make authorization decisions; an identity returned here may still be
/// expired or carry an unknown role, which the guard chain rejects.
#[async_trait]
pub trait AuthNResolverClient: Send + Sync {
    /// Authenticate a bearer token and return the validated identity.
    ///
    /// # Arguments
    ///
    /// * `bearer_token` - The raw bearer token string (without "Bearer " prefix)
    ///
    /// # Errors
    ///
    /// - `Unauthorized` if the token is invalid or malformed
    /// - `ServiceUnavailable` if the authenticator is not ready
    /// - `Internal` for unexpected errors
    async fn authenticate(
        &self,
        bearer_token: &str,
    ) -> Result<AuthenticationResult, AuthNResolverError>;
}
