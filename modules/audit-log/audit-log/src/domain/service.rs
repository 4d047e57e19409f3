use std::sync::Arc;

use audit_log_sdk::{AuditRecord, NewAuditRecord};
use authz_resolver_sdk::{Action, GuardChain, PermissionRequirement, Resource};
use chrono::Utc;
use taskhub_security::IdentityContext;
use uuid::Uuid;

use super::error::DomainError;
use super::repo::AuditRepository;
use crate::config::AuditLogConfig;

/// Reading the trail requires `view_audit` on tasks.
pub const VIEW_AUDIT: PermissionRequirement =
    PermissionRequirement::new(Resource::Task, Action::ViewAudit);

pub struct Service<R: AuditRepository> {
    repo: Arc<R>,
    guard: GuardChain,
    config: AuditLogConfig,
}

impl<R: AuditRepository> Service<R> {
    #[must_use]
    pub fn new(repo: Arc<R>, guard: GuardChain, config: AuditLogConfig) -> Self {
        Self {
            repo,
            guard,
            config,
        }
    }

    #[must_use]
    pub fn config(&self) -> &AuditLogConfig {
        &self.config
    }

    /// Append a record for `actor`, stamped with a fresh id and the current
    /// time. The owning organization is the actor's.
    #[tracing::instrument(
        skip_all,
        fields(action = %entry.action, resource = %entry.resource_type, outcome = ?entry.outcome)
    )]
    pub async fn record(
        &self,
        actor: &IdentityContext,
        entry: NewAuditRecord,
    ) -> Result<AuditRecord, DomainError> {
        let record = AuditRecord {
            id: Uuid::new_v4(),
            organization_id: actor.organization_id(),
            actor_subject_id: actor.subject_id(),
            action: entry.action,
            resource_type: entry.resource_type,
            resource_id: entry.resource_id,
            timestamp: Utc::now(),
            outcome: entry.outcome,
            details: entry.details.map(|d| self.truncate(d)),
        };

        self.repo.append(record.clone()).await?;
        tracing::debug!(record_id = %record.id, "audit record appended");
        Ok(record)
    }

    #[tracing::instrument(skip_all)]
    pub async fn list_for_organization(
        &self,
        ctx: &IdentityContext,
    ) -> Result<Vec<AuditRecord>, DomainError> {
        let ctx = self.guard.run(Some(ctx), Some(&VIEW_AUDIT), None)?;
        self.repo.list_by_organization(ctx.organization_id()).await
    }

    #[tracing::instrument(skip_all, fields(actor = %actor_subject_id))]
    pub async fn list_for_actor(
        &self,
        ctx: &IdentityContext,
        actor_subject_id: Uuid,
    ) -> Result<Vec<AuditRecord>, DomainError> {
        let ctx = self.guard.run(Some(ctx), Some(&VIEW_AUDIT), None)?;
        self.repo
            .list_by_actor(ctx.organization_id(), actor_subject_id)
            .await
    }

    fn truncate(&self, details: String) -> String {
        let max = self.config.max_details_length;
        if details.chars().count() <= max {
            return details;
        }
        details.chars().take(max).collect()
    }
}
