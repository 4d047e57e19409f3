//! Public API trait for the audit log.

use async_trait::async_trait;
use taskhub_security::IdentityContext;
use uuid::Uuid;

use crate::error::AuditLogError;
use crate::models::{AuditRecord, NewAuditRecord};

/// Append-only audit trail.
///
/// Appending is the only mutation. Records are owned by the organization of
/// the actor at the time they are written.
#[async_trait]
pub trait AuditRecorder: Send + Sync {
    /// Append one record for an operation attempted by `actor`.
    ///
    /// # Errors
    ///
    /// - `Unavailable` / `Internal` if the record could not be persisted
    async fn record(
        &self,
        actor: &IdentityContext,
        entry: NewAuditRecord,
    ) -> Result<AuditRecord, AuditLogError>;

    /// Records owned by the caller's organization, newest first.
    ///
    /// # Errors
    ///
    /// - `Denied` if the caller may not view the audit trail
    /// - `Unavailable` / `Internal` on storage failure
    async fn list_for_organization(
        &self,
        ctx: &IdentityContext,
    ) -> Result<Vec<AuditRecord>, AuditLogError>;

    /// Records of one actor within the caller's organization, newest first.
    ///
    /// # Errors
    ///
    /// Same as [`AuditRecorder::list_for_organization`].
    async fn list_for_actor(
        &self,
        ctx: &IdentityContext,
        actor_subject_id: Uuid,
    ) -> Result<Vec<AuditRecord>, AuditLogError>;
}
