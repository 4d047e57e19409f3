//! Error types for the authorization core.

use serde::Serialize;
use thiserror::Error;

use crate::models::{Action, Resource};

/// Guard chain stage, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GuardStage {
    Authenticate,
    Authorize,
    Tenancy,
}

impl GuardStage {
    pub const ORDER: [Self; 3] = [Self::Authenticate, Self::Authorize, Self::Tenancy];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Authenticate => "authenticate",
            Self::Authorize => "authorize",
            Self::Tenancy => "tenancy",
        }
    }
}

/// Why a valid identity was refused.
///
/// Messages name the failed check only; they never echo organization or
/// resource identifiers from the request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DenyReason {
    #[error("Insufficient permissions: {action} on {resource}")]
    MissingPermission { resource: Resource, action: Action },

    #[error("Cannot access resources from other organizations")]
    OrganizationMismatch,
}

/// Terminal denial from the guard chain.
///
/// Denials are deterministic: retrying with the same identity, role and
/// tenant reproduces the same result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GuardError {
    /// No identity, or an expired one.
    #[error("Authentication required")]
    Unauthenticated,

    /// Valid identity with insufficient permission or the wrong tenant.
    #[error("{0}")]
    Forbidden(DenyReason),
}

impl GuardError {
    /// The stage that produced this denial.
    #[must_use]
    pub fn stage(&self) -> GuardStage {
        match self {
            Self::Unauthenticated => GuardStage::Authenticate,
            Self::Forbidden(DenyReason::MissingPermission { .. }) => GuardStage::Authorize,
            Self::Forbidden(DenyReason::OrganizationMismatch) => GuardStage::Tenancy,
        }
    }
}

/// Errors from building an [`OperationRegistry`](crate::pep::OperationRegistry).
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("operation '{0}' is already registered")]
    DuplicateOperation(String),
}

/// Infrastructure failure while looking up a resource's organization.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("organization lookup unavailable: {0}")]
    Unavailable(String),

    #[error("internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn forbidden_message_names_missing_permission() {
        let err = GuardError::Forbidden(DenyReason::MissingPermission {
            resource: Resource::Task,
            action: Action::Create,
        });
        assert_eq!(err.to_string(), "Insufficient permissions: create on task");
        assert_eq!(err.stage(), GuardStage::Authorize);
    }

    #[test]
    fn stage_order_is_authenticate_authorize_tenancy() {
        assert_eq!(
            GuardStage::ORDER.map(GuardStage::as_str),
            ["authenticate", "authorize", "tenancy"]
        );
        assert_eq!(GuardError::Unauthenticated.stage(), GuardStage::Authenticate);
        assert_eq!(
            GuardError::Forbidden(DenyReason::OrganizationMismatch).stage(),
            GuardStage::Tenancy
        );
    }
}
