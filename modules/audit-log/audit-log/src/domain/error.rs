use audit_log_sdk::AuditLogError;
use authz_resolver_sdk::GuardError;

#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error(transparent)]
    Denied(#[from] GuardError),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    #[must_use]
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable(message.into())
    }

    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}

impl From<DomainError> for AuditLogError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::Denied(denial) => Self::Denied(denial),
            DomainError::Unavailable(msg) => Self::Unavailable(msg),
            DomainError::Internal(msg) => Self::Internal(msg),
        }
    }
}
