#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;

use authz_resolver_sdk::OrganizationResolver;
use chrono::Utc;
use tasks::{InMemoryTaskRepository, Task, TaskOrganizationResolver, TaskRepository, TaskStatus};
use uuid::Uuid;

fn task(org: Uuid) -> Task {
    let now = Utc::now();
    Task {
        id: Uuid::new_v4(),
        organization_id: org,
        title: "t".to_owned(),
        description: String::new(),
        status: TaskStatus::Todo,
        category: String::new(),
        created_by: Uuid::new_v4(),
        assigned_to: None,
        due_date: None,
        order: 0,
        created_at: now,
        updated_at: now,
    }
}

#[tokio::test]
async fn resolves_owner_of_existing_task() {
    let repo = Arc::new(InMemoryTaskRepository::new());
    let org = Uuid::new_v4();
    let stored = repo.insert_next(task(org)).await.unwrap();

    let resolver: Arc<dyn OrganizationResolver> =
        Arc::new(TaskOrganizationResolver::new(Arc::clone(&repo)));

    assert_eq!(resolver.organization_of(stored.id).await.unwrap(), Some(org));
    assert_eq!(resolver.organization_of(Uuid::new_v4()).await.unwrap(), None);
}
