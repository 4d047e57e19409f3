//! Domain models for token authentication.

use taskhub_security::IdentityContext;

/// Result of a successful authentication.
#[derive(Debug, Clone)]
pub struct AuthenticationResult {
    /// Identity built from the token claims, including the original bearer
    /// token as a secret.
    pub identity: IdentityContext,
}
