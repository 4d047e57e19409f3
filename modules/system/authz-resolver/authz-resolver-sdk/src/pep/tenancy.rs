//! Tenancy guard.

use taskhub_security::IdentityContext;
use uuid::Uuid;

/// Outcome of the organization isolation check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TenancyDecision {
    Allow,
    Deny,
}

impl TenancyDecision {
    #[must_use]
    pub const fn is_allowed(self) -> bool {
        matches!(self, Self::Allow)
    }
}

/// Compares the caller's organization with the one targeted by the request.
///
/// An operation that does not target a specific organization is allowed.
/// Otherwise the two ids must be equal; no role bypasses this check.
#[must_use]
pub fn check_tenancy(identity: &IdentityContext, requested: Option<Uuid>) -> TenancyDecision {
    match requested {
        None => TenancyDecision::Allow,
        Some(org) if org == identity.organization_id() => TenancyDecision::Allow,
        Some(_) => TenancyDecision::Deny,
    }
}
