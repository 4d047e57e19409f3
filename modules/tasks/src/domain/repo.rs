use async_trait::async_trait;
use uuid::Uuid;

use super::error::DomainError;
use super::models::Task;

/// Storage port for tasks.
///
/// Every method except [`TaskRepository::organization_of`] takes the owning
/// organization and never returns or touches a task outside it.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Store a new task, assigning `order = max(order in org) + 1`
    /// (0 for the first task) atomically with the insert.
    async fn insert_next(&self, task: Task) -> Result<Task, DomainError>;

    async fn find(&self, organization_id: Uuid, id: Uuid) -> Result<Option<Task>, DomainError>;

    /// Ordered by `order` ascending, then newest first.
    async fn list(&self, organization_id: Uuid) -> Result<Vec<Task>, DomainError>;

    /// Replace a stored task. Returns `false` if it does not exist in the
    /// task's organization.
    async fn replace(&self, task: Task) -> Result<bool, DomainError>;

    /// Returns `false` if nothing was deleted.
    async fn delete(&self, organization_id: Uuid, id: Uuid) -> Result<bool, DomainError>;

    /// Owning organization of a task, regardless of the caller.
    async fn organization_of(&self, id: Uuid) -> Result<Option<Uuid>, DomainError>;
}
