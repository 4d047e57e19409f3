use async_trait::async_trait;
use audit_log_sdk::AuditRecord;
use uuid::Uuid;

use super::error::DomainError;

/// Append-only storage port for audit records.
///
/// Implementations must accept concurrent appends without losing records and
/// return listings newest first.
#[async_trait]
pub trait AuditRepository: Send + Sync {
    async fn append(&self, record: AuditRecord) -> Result<(), DomainError>;

    async fn list_by_organization(
        &self,
        organization_id: Uuid,
    ) -> Result<Vec<AuditRecord>, DomainError>;

    async fn list_by_actor(
        &self,
        organization_id: Uuid,
        actor_subject_id: Uuid,
    ) -> Result<Vec<AuditRecord>, DomainError>;
}
