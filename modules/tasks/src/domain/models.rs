use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    Done,
}

/// A task owned by exactly one organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub category: String,
    pub created_by: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    pub order: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a task. Ownership fields are taken from the caller.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewTask {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub assigned_to: Option<Uuid>,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
}

/// Partial update. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub category: Option<String>,
    pub assigned_to: Option<Uuid>,
    pub due_date: Option<DateTime<Utc>>,
    pub order: Option<i64>,
}

impl TaskPatch {
    pub(crate) fn apply(self, task: &mut Task) {
        if let Some(title) = self.title {
            task.title = title;
        }
        if let Some(description) = self.description {
            task.description = description;
        }
        if let Some(status) = self.status {
            task.status = status;
        }
        if let Some(category) = self.category {
            task.category = category;
        }
        if let Some(assignee) = self.assigned_to {
            task.assigned_to = Some(assignee);
        }
        if let Some(due) = self.due_date {
            task.due_date = Some(due);
        }
        if let Some(order) = self.order {
            task.order = order;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReorderEntry {
    pub id: Uuid,
    pub order: i64,
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn new_task_rejects_ownership_fields() {
        let res: Result<NewTask, _> = serde_json::from_str(
            r#"{ "title": "x", "organizationId": "550e8400-e29b-41d4-a716-446655440000" }"#,
        );
        assert!(res.is_err());
    }

    #[test]
    fn new_task_defaults_optional_fields() {
        let input: NewTask = serde_json::from_str(r#"{ "title": "Write report" }"#).unwrap();
        assert_eq!(input.status, TaskStatus::Todo);
        assert!(input.category.is_empty());
        assert!(input.assigned_to.is_none());
    }

    #[test]
    fn status_uses_snake_case() {
        let patch: TaskPatch = serde_json::from_str(r#"{ "status": "in_progress" }"#).unwrap();
        assert_eq!(patch.status, Some(TaskStatus::InProgress));
    }
}
