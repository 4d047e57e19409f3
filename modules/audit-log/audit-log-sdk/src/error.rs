//! Error types for the audit log.

use authz_resolver_sdk::GuardError;
use thiserror::Error;

/// Errors that can occur when using the audit log API.
#[derive(Debug, Error)]
pub enum AuditLogError {
    /// The caller may not read the audit trail.
    #[error(transparent)]
    Denied(#[from] GuardError),

    /// The audit store cannot accept or serve requests right now.
    #[error("audit store unavailable: {0}")]
    Unavailable(String),

    /// An internal error occurred.
    #[error("internal error: {0}")]
    Internal(String),
}
