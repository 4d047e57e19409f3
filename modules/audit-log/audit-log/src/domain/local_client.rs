//! Local (in-process) client for the audit log.

use std::sync::Arc;

use async_trait::async_trait;
use audit_log_sdk::{AuditLogError, AuditRecord, AuditRecorder, NewAuditRecord};
use taskhub_security::IdentityContext;
use uuid::Uuid;

use super::error::DomainError;
use super::repo::AuditRepository;
use super::service::Service;

/// Local client wrapping the service.
pub struct AuditLogLocalClient<R: AuditRepository> {
    svc: Arc<Service<R>>,
}

impl<R: AuditRepository> AuditLogLocalClient<R> {
    #[must_use]
    pub fn new(svc: Arc<Service<R>>) -> Self {
        Self { svc }
    }
}

fn log_and_convert(op: &str, e: DomainError) -> AuditLogError {
    match &e {
        DomainError::Denied(reason) => {
            tracing::debug!(operation = op, %reason, "audit_log access denied");
        }
        DomainError::Unavailable(_) | DomainError::Internal(_) => {
            tracing::error!(operation = op, error = ?e, "audit_log call failed");
        }
    }
    e.into()
}

#[async_trait]
impl<R: AuditRepository + 'static> AuditRecorder for AuditLogLocalClient<R> {
    async fn record(
        &self,
        actor: &IdentityContext,
        entry: NewAuditRecord,
    ) -> Result<AuditRecord, AuditLogError> {
        self.svc
            .record(actor, entry)
            .await
            .map_err(|e| log_and_convert("record", e))
    }

    async fn list_for_organization(
        &self,
        ctx: &IdentityContext,
    ) -> Result<Vec<AuditRecord>, AuditLogError> {
        self.svc
            .list_for_organization(ctx)
            .await
            .map_err(|e| log_and_convert("list_for_organization", e))
    }

    async fn list_for_actor(
        &self,
        ctx: &IdentityContext,
        actor_subject_id: Uuid,
    ) -> Result<Vec<AuditRecord>, AuditLogError> {
        self.svc
            .list_for_actor(ctx, actor_subject_id)
            .await
            .map_err(|e| log_and_convert("list_for_actor", e))
    }
}
