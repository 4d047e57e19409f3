use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::fields::TaskFields;
use crate::domain::models::Task;
use crate::domain::repo::TaskRepository;

/// Process-local task store keyed by task id.
#[derive(Default)]
pub struct InMemoryTaskRepository {
    tasks: RwLock<HashMap<Uuid, Task>>,
}

impl InMemoryTaskRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn insert_next(&self, mut task: Task) -> Result<Task, DomainError> {
        let mut tasks = self.tasks.write();
        let last = tasks
            .values()
            .filter(|t| t.organization_id == task.organization_id)
            .map(|t| t.order)
            .max();
        task.order = match last {
            None => 0,
            Some(max) => max.checked_add(1).ok_or_else(|| {
                DomainError::validation(TaskFields::ORDER, "no position left after the last task")
            })?,
        };
        if tasks.contains_key(&task.id) {
            return Err(DomainError::internal("duplicate task id"));
        }
        tasks.insert(task.id, task.clone());
        Ok(task)
    }

    async fn find(&self, organization_id: Uuid, id: Uuid) -> Result<Option<Task>, DomainError> {
        Ok(self
            .tasks
            .read()
            .get(&id)
            .filter(|t| t.organization_id == organization_id)
            .cloned())
    }

    async fn list(&self, organization_id: Uuid) -> Result<Vec<Task>, DomainError> {
        let mut list: Vec<Task> = self
            .tasks
            .read()
            .values()
            .filter(|t| t.organization_id == organization_id)
            .cloned()
            .collect();
        list.sort_by(|a, b| {
            a.order
                .cmp(&b.order)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });
        Ok(list)
    }

    async fn replace(&self, task: Task) -> Result<bool, DomainError> {
        let mut tasks = self.tasks.write();
        match tasks.get_mut(&task.id) {
            Some(stored) if stored.organization_id == task.organization_id => {
                *stored = task;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn delete(&self, organization_id: Uuid, id: Uuid) -> Result<bool, DomainError> {
        let mut tasks = self.tasks.write();
        if tasks
            .get(&id)
            .is_some_and(|t| t.organization_id == organization_id)
        {
            tasks.remove(&id);
            return Ok(true);
        }
        Ok(false)
    }

    async fn organization_of(&self, id: Uuid) -> Result<Option<Uuid>, DomainError> {
        Ok(self.tasks.read().get(&id).map(|t| t.organization_id))
    }
}
