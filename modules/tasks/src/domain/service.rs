use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use audit_log_sdk::{AuditRecorder, NewAuditRecord};
use authz_resolver_sdk::{Action, Resource};
use chrono::Utc;
use taskhub_security::IdentityContext;
use uuid::Uuid;

use super::error::DomainError;
use super::fields::{MAX_ORDER, TaskFields};
use super::models::{NewTask, ReorderEntry, Task, TaskPatch};
use super::repo::TaskRepository;
use crate::config::TasksConfig;

pub struct Service<R: TaskRepository> {
    repo: Arc<R>,
    audit: Arc<dyn AuditRecorder>,
    config: TasksConfig,
}

impl<R: TaskRepository> Service<R> {
    #[must_use]
    pub fn new(repo: Arc<R>, audit: Arc<dyn AuditRecorder>, config: TasksConfig) -> Self {
        Self {
            repo,
            audit,
            config,
        }
    }

    #[tracing::instrument(skip_all)]
    pub async fn create(&self, ctx: &IdentityContext, input: NewTask) -> Result<Task, DomainError> {
        let outcome = self.try_create(ctx, input).await;
        let target = outcome.as_ref().ok().map(|t| t.id);
        self.audited(ctx, Action::Create, target, outcome).await
    }

    #[tracing::instrument(skip_all)]
    pub async fn list(&self, ctx: &IdentityContext) -> Result<Vec<Task>, DomainError> {
        self.repo.list(ctx.organization_id()).await
    }

    #[tracing::instrument(skip_all, fields(task_id = %id))]
    pub async fn get(&self, ctx: &IdentityContext, id: Uuid) -> Result<Task, DomainError> {
        self.repo
            .find(ctx.organization_id(), id)
            .await?
            .ok_or(DomainError::NotFound)
    }

    #[tracing::instrument(skip_all, fields(task_id = %id))]
    pub async fn update(
        &self,
        ctx: &IdentityContext,
        id: Uuid,
        patch: TaskPatch,
    ) -> Result<Task, DomainError> {
        let outcome = self.try_update(ctx, id, patch).await;
        self.audited(ctx, Action::Update, Some(id), outcome).await
    }

    #[tracing::instrument(skip_all, fields(task_id = %id))]
    pub async fn delete(&self, ctx: &IdentityContext, id: Uuid) -> Result<(), DomainError> {
        let outcome = match self.repo.delete(ctx.organization_id(), id).await {
            Ok(true) => Ok(()),
            Ok(false) => Err(DomainError::NotFound),
            Err(e) => Err(e),
        };
        self.audited(ctx, Action::Delete, Some(id), outcome).await
    }

    /// Apply new positions to several tasks at once.
    ///
    /// Ids must be distinct and all exist in the caller's organization;
    /// otherwise nothing is changed. A task removed while the new positions
    /// are written fails the whole reorder with [`DomainError::NotFound`].
    /// Audited as a single update.
    #[tracing::instrument(skip_all, fields(count = entries.len()))]
    pub async fn reorder(
        &self,
        ctx: &IdentityContext,
        entries: Vec<ReorderEntry>,
    ) -> Result<(), DomainError> {
        let count = entries.len();
        let outcome = self.try_reorder(ctx, entries).await;
        let entry = match &outcome {
            Ok(()) => NewAuditRecord::success(Action::Update, Resource::Task, None)
                .with_details(format!("reordered {count} tasks")),
            Err(e) => NewAuditRecord::failure(Action::Update, Resource::Task, None)
                .with_details(e.to_string()),
        };
        self.append(ctx, entry).await?;
        outcome
    }

    /// Record a mutating attempt whose input was refused before it reached
    /// this service (undecodable body or id) and return that refusal.
    ///
    /// # Errors
    /// Returns `error`, or the audit failure if the record cannot be appended.
    pub async fn reject<T>(
        &self,
        ctx: &IdentityContext,
        action: Action,
        target: Option<Uuid>,
        error: DomainError,
    ) -> Result<T, DomainError> {
        self.audited(ctx, action, target, Err(error)).await
    }

    async fn try_create(&self, ctx: &IdentityContext, input: NewTask) -> Result<Task, DomainError> {
        self.validate_title(&input.title)?;
        validate_length(TaskFields::CATEGORY, &input.category, self.config.max_category_length)?;
        validate_length(
            TaskFields::DESCRIPTION,
            &input.description,
            self.config.max_description_length,
        )?;

        let now = Utc::now();
        let task = Task {
            id: Uuid::new_v4(),
            organization_id: ctx.organization_id(),
            title: input.title,
            description: input.description,
            status: input.status,
            category: input.category,
            created_by: ctx.subject_id(),
            assigned_to: input.assigned_to,
            due_date: input.due_date,
            order: 0,
            created_at: now,
            updated_at: now,
        };
        self.repo.insert_next(task).await
    }

    async fn try_update(
        &self,
        ctx: &IdentityContext,
        id: Uuid,
        patch: TaskPatch,
    ) -> Result<Task, DomainError> {
        if let Some(ref title) = patch.title {
            self.validate_title(title)?;
        }
        if let Some(ref category) = patch.category {
            validate_length(TaskFields::CATEGORY, category, self.config.max_category_length)?;
        }
        if let Some(ref description) = patch.description {
            validate_length(
                TaskFields::DESCRIPTION,
                description,
                self.config.max_description_length,
            )?;
        }
        if let Some(order) = patch.order {
            validate_order(order)?;
        }

        let mut task = self.get(ctx, id).await?;
        patch.apply(&mut task);
        task.updated_at = Utc::now();

        if self.repo.replace(task.clone()).await? {
            Ok(task)
        } else {
            Err(DomainError::NotFound)
        }
    }

    async fn try_reorder(
        &self,
        ctx: &IdentityContext,
        entries: Vec<ReorderEntry>,
    ) -> Result<(), DomainError> {
        let mut seen = HashSet::with_capacity(entries.len());
        for entry in &entries {
            validate_order(entry.order)?;
            if !seen.insert(entry.id) {
                return Err(DomainError::validation(
                    TaskFields::ID,
                    "must not repeat within one reorder",
                ));
            }
        }

        let org = ctx.organization_id();
        let mut tasks = HashMap::with_capacity(entries.len());
        for entry in &entries {
            let task = self.repo.find(org, entry.id).await?.ok_or(DomainError::NotFound)?;
            tasks.insert(entry.id, task);
        }

        let now = Utc::now();
        for entry in entries {
            let Some(mut task) = tasks.remove(&entry.id) else {
                continue;
            };
            task.order = entry.order;
            task.updated_at = now;
            if !self.repo.replace(task).await? {
                return Err(DomainError::NotFound);
            }
        }
        Ok(())
    }

    /// Append the audit record for a finished attempt and hand back its
    /// outcome. A failed append is reported instead of the outcome.
    async fn audited<T>(
        &self,
        ctx: &IdentityContext,
        action: Action,
        target: Option<Uuid>,
        outcome: Result<T, DomainError>,
    ) -> Result<T, DomainError> {
        let resource_id = target.map(|id| id.to_string());
        let entry = match &outcome {
            Ok(_) => NewAuditRecord::success(action, Resource::Task, resource_id),
            Err(e) => {
                tracing::debug!(%action, error = %e, "task operation failed");
                NewAuditRecord::failure(action, Resource::Task, resource_id)
                    .with_details(e.to_string())
            }
        };
        self.append(ctx, entry).await?;
        outcome
    }

    async fn append(&self, ctx: &IdentityContext, entry: NewAuditRecord) -> Result<(), DomainError> {
        self.audit.record(ctx, entry).await.map(drop).map_err(|e| {
            tracing::error!(error = %e, "failed to append audit record");
            DomainError::from(e)
        })
    }

    fn validate_title(&self, title: &str) -> Result<(), DomainError> {
        if title.trim().is_empty() {
            return Err(DomainError::validation(TaskFields::TITLE, "must not be empty"));
        }
        validate_length(TaskFields::TITLE, title, self.config.max_title_length)
    }
}

fn validate_length(field: &str, value: &str, max: usize) -> Result<(), DomainError> {
    if value.chars().count() > max {
        return Err(DomainError::validation(
            field,
            format!("exceeds maximum length of {max}"),
        ));
    }
    Ok(())
}

fn validate_order(order: i64) -> Result<(), DomainError> {
    if !(0..=MAX_ORDER).contains(&order) {
        return Err(DomainError::validation(
            TaskFields::ORDER,
            format!("must be between 0 and {MAX_ORDER}"),
        ));
    }
    Ok(())
}
