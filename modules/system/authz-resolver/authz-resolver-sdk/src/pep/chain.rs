//! Guard chain: Authenticate → Authorize → Tenancy.
//!
//! Stages run strictly in order and the first failure is terminal, so an
//! unauthenticated caller is never told whether it would have been
//! permitted, and a permission denial never leaks tenancy information.

use chrono::{DateTime, Utc};
use taskhub_security::IdentityContext;
use uuid::Uuid;

use crate::error::{DenyReason, GuardError};
use crate::evaluator::Authorizer;
use crate::models::PermissionRequirement;
use crate::pep::registry::OperationDescriptor;
use crate::pep::tenancy::{TenancyDecision, check_tenancy};

/// Composes the identity check, authorization evaluator and tenancy guard.
#[derive(Debug, Clone, Default)]
pub struct GuardChain {
    authorizer: Authorizer,
}

impl GuardChain {
    #[must_use]
    pub fn new(authorizer: Authorizer) -> Self {
        Self { authorizer }
    }

    #[must_use]
    pub fn authorizer(&self) -> &Authorizer {
        &self.authorizer
    }

    /// Run the chain against the current time.
    ///
    /// # Errors
    ///
    /// See [`GuardChain::run_at`].
    pub fn run<'a>(
        &self,
        identity: Option<&'a IdentityContext>,
        requirement: Option<&PermissionRequirement>,
        organization_id: Option<Uuid>,
    ) -> Result<&'a IdentityContext, GuardError> {
        self.run_at(identity, requirement, organization_id, Utc::now())
    }

    /// Run the chain at an explicit instant.
    ///
    /// On success the admitted identity is handed back for the operation
    /// body to use.
    ///
    /// # Errors
    ///
    /// - [`GuardError::Unauthenticated`] if the identity is absent or expired
    /// - [`GuardError::Forbidden`] with [`DenyReason::MissingPermission`] if
    ///   the role lacks the required permission
    /// - [`GuardError::Forbidden`] with [`DenyReason::OrganizationMismatch`]
    ///   if the target organization differs from the caller's
    pub fn run_at<'a>(
        &self,
        identity: Option<&'a IdentityContext>,
        requirement: Option<&PermissionRequirement>,
        organization_id: Option<Uuid>,
        now: DateTime<Utc>,
    ) -> Result<&'a IdentityContext, GuardError> {
        let Some(identity) = identity else {
            tracing::debug!(stage = "authenticate", "no identity presented");
            return Err(GuardError::Unauthenticated);
        };
        if identity.is_expired_at(now) {
            tracing::debug!(
                stage = "authenticate",
                subject_id = %identity.subject_id(),
                "identity expired"
            );
            return Err(GuardError::Unauthenticated);
        }

        if let Some(req) = requirement
            && !self.authorizer.satisfies(identity.role(), req)
        {
            tracing::warn!(
                stage = "authorize",
                subject_id = %identity.subject_id(),
                role = identity.role(),
                resource = %req.resource,
                action = %req.action,
                "permission denied"
            );
            return Err(GuardError::Forbidden(DenyReason::MissingPermission {
                resource: req.resource,
                action: req.action,
            }));
        }

        if check_tenancy(identity, organization_id) == TenancyDecision::Deny {
            tracing::warn!(
                stage = "tenancy",
                subject_id = %identity.subject_id(),
                "cross-organization access denied"
            );
            return Err(GuardError::Forbidden(DenyReason::OrganizationMismatch));
        }

        Ok(identity)
    }

    /// Run the chain for a registered operation.
    ///
    /// Public descriptors still need an identity here; callers that serve
    /// them anonymously must not call this.
    ///
    /// # Errors
    ///
    /// Same as [`GuardChain::run`].
    pub fn admit<'a>(
        &self,
        identity: Option<&'a IdentityContext>,
        operation: &OperationDescriptor,
        organization_id: Option<Uuid>,
    ) -> Result<&'a IdentityContext, GuardError> {
        self.run(identity, operation.requirement.as_ref(), organization_id)
    }
}
