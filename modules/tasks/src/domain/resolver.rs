use std::sync::Arc;

use async_trait::async_trait;
use authz_resolver_sdk::{OrganizationResolver, ResolveError};
use uuid::Uuid;

use super::error::DomainError;
use super::repo::TaskRepository;

/// Resolves the owning organization of a task for the tenancy guard.
pub struct TaskOrganizationResolver<R: TaskRepository> {
    repo: Arc<R>,
}

impl<R: TaskRepository> TaskOrganizationResolver<R> {
    #[must_use]
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl<R: TaskRepository + 'static> OrganizationResolver for TaskOrganizationResolver<R> {
    async fn organization_of(&self, resource_id: Uuid) -> Result<Option<Uuid>, ResolveError> {
        self.repo
            .organization_of(resource_id)
            .await
            .map_err(|e| match e {
                DomainError::Unavailable(msg) => ResolveError::Unavailable(msg),
                other => ResolveError::Internal(other.to_string()),
            })
    }
}
