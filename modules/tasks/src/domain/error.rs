use audit_log_sdk::AuditLogError;

#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("Task not found")]
    NotFound,

    #[error("Validation error on field '{field}': {message}")]
    Validation { field: String, message: String },

    #[error("Audit trail unavailable: {0}")]
    Audit(#[from] AuditLogError),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    #[must_use]
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Infrastructure failures, as opposed to outcomes of the request itself.
    #[must_use]
    pub fn is_infrastructure(&self) -> bool {
        matches!(self, Self::Audit(_) | Self::Unavailable(_) | Self::Internal(_))
    }
}
