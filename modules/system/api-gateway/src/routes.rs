//! Operation declarations and HTTP handlers.
//!
//! Each route names an operation whose descriptor carries the permission
//! requirement and tenancy binding. The guard middleware admits the caller
//! before a handler runs, so handlers only see an admitted
//! [`IdentityContext`].

use std::sync::Arc;

use audit_log_sdk::{AuditRecord, AuditRecorder};
use authz_resolver_sdk::{
    Action, OperationDescriptor, PermissionRequirement, Resource, TenancyBinding,
};
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Extension, Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use http::{Method, StatusCode};
use serde_json::json;
use taskhub_security::IdentityContext;
use tasks::{DomainError, NewTask, ReorderEntry, Task, TaskFields, TaskPatch, TaskRepository};
use uuid::Uuid;

use crate::problem::Problem;

const TASK_CREATE: PermissionRequirement =
    PermissionRequirement::new(Resource::Task, Action::Create);
const TASK_READ: PermissionRequirement = PermissionRequirement::new(Resource::Task, Action::Read);
const TASK_UPDATE: PermissionRequirement =
    PermissionRequirement::new(Resource::Task, Action::Update);
const TASK_DELETE: PermissionRequirement =
    PermissionRequirement::new(Resource::Task, Action::Delete);
const VIEW_AUDIT: PermissionRequirement =
    PermissionRequirement::new(Resource::Task, Action::ViewAudit);

const TASK_BY_ID: TenancyBinding = TenancyBinding::ResourceParam {
    param: "id",
    resource: Resource::Task,
};
const ORGANIZATION_PARAM: TenancyBinding = TenancyBinding::OrganizationParam("organization_id");

pub const HEALTH: OperationDescriptor = OperationDescriptor::public("health");
pub const TASKS_CREATE: OperationDescriptor = OperationDescriptor::new("tasks.create", TASK_CREATE);
pub const TASKS_LIST: OperationDescriptor = OperationDescriptor::new("tasks.list", TASK_READ);
pub const TASKS_REORDER: OperationDescriptor =
    OperationDescriptor::new("tasks.reorder", TASK_UPDATE);
pub const TASKS_GET: OperationDescriptor =
    OperationDescriptor::new("tasks.get", TASK_READ).with_tenancy(TASK_BY_ID);
pub const TASKS_UPDATE: OperationDescriptor =
    OperationDescriptor::new("tasks.update", TASK_UPDATE).with_tenancy(TASK_BY_ID);
pub const TASKS_DELETE: OperationDescriptor =
    OperationDescriptor::new("tasks.delete", TASK_DELETE).with_tenancy(TASK_BY_ID);
pub const TASKS_LIST_FOR_ORGANIZATION: OperationDescriptor =
    OperationDescriptor::new("tasks.list_for_organization", TASK_READ)
        .with_tenancy(ORGANIZATION_PARAM);
pub const AUDIT_LOG_LIST: OperationDescriptor =
    OperationDescriptor::new("audit_log.list", VIEW_AUDIT);
pub const AUDIT_LOG_LIST_FOR_ACTOR: OperationDescriptor =
    OperationDescriptor::new("audit_log.list_for_actor", VIEW_AUDIT);
pub const AUDIT_LOG_LIST_FOR_ORGANIZATION: OperationDescriptor =
    OperationDescriptor::new("audit_log.list_for_organization", VIEW_AUDIT)
        .with_tenancy(ORGANIZATION_PARAM);

/// Every operation the gateway serves.
#[must_use]
pub fn operations() -> Vec<OperationDescriptor> {
    vec![
        HEALTH,
        TASKS_CREATE,
        TASKS_LIST,
        TASKS_REORDER,
        TASKS_GET,
        TASKS_UPDATE,
        TASKS_DELETE,
        TASKS_LIST_FOR_ORGANIZATION,
        AUDIT_LOG_LIST,
        AUDIT_LOG_LIST_FOR_ACTOR,
        AUDIT_LOG_LIST_FOR_ORGANIZATION,
    ]
}

/// `(method, path, operation id)` for every served route.
#[must_use]
pub fn route_table() -> Vec<(Method, &'static str, &'static str)> {
    vec![
        (Method::GET, "/health", HEALTH.operation_id),
        (Method::POST, "/tasks", TASKS_CREATE.operation_id),
        (Method::GET, "/tasks", TASKS_LIST.operation_id),
        (Method::POST, "/tasks/reorder", TASKS_REORDER.operation_id),
        (Method::GET, "/tasks/{id}", TASKS_GET.operation_id),
        (Method::PUT, "/tasks/{id}", TASKS_UPDATE.operation_id),
        (Method::DELETE, "/tasks/{id}", TASKS_DELETE.operation_id),
        (
            Method::GET,
            "/organizations/{organization_id}/tasks",
            TASKS_LIST_FOR_ORGANIZATION.operation_id,
        ),
        (Method::GET, "/audit-log", AUDIT_LOG_LIST.operation_id),
        (
            Method::GET,
            "/audit-log/actors/{subject_id}",
            AUDIT_LOG_LIST_FOR_ACTOR.operation_id,
        ),
        (
            Method::GET,
            "/organizations/{organization_id}/audit-log",
            AUDIT_LOG_LIST_FOR_ORGANIZATION.operation_id,
        ),
    ]
}

/// Handler state.
pub struct AppState<R: TaskRepository> {
    pub tasks: Arc<tasks::Service<R>>,
    pub audit: Arc<dyn AuditRecorder>,
}

impl<R: TaskRepository> Clone for AppState<R> {
    fn clone(&self) -> Self {
        Self {
            tasks: Arc::clone(&self.tasks),
            audit: Arc::clone(&self.audit),
        }
    }
}

/// Routes for every entry of [`route_table`], without middleware.
#[must_use]
pub fn router<R: TaskRepository + 'static>() -> Router<AppState<R>> {
    Router::new()
        .route("/health", get(|| async { Json(json!({ "status": "ok" })) }))
        .route("/tasks", post(create_task::<R>).get(list_tasks::<R>))
        .route("/tasks/reorder", post(reorder_tasks::<R>))
        .route(
            "/tasks/{id}",
            get(get_task::<R>)
                .put(update_task::<R>)
                .delete(delete_task::<R>),
        )
        .route(
            "/organizations/{organization_id}/tasks",
            get(list_tasks::<R>),
        )
        .route("/audit-log", get(list_audit_log::<R>))
        .route(
            "/audit-log/actors/{subject_id}",
            get(list_actor_audit_log::<R>),
        )
        .route(
            "/organizations/{organization_id}/audit-log",
            get(list_audit_log::<R>),
        )
}

async fn create_task<R: TaskRepository + 'static>(
    State(state): State<AppState<R>>,
    Extension(ctx): Extension<IdentityContext>,
    input: Result<Json<NewTask>, JsonRejection>,
) -> Result<(StatusCode, Json<Task>), Problem> {
    let task = match input {
        Ok(Json(input)) => state.tasks.create(&ctx, input).await?,
        Err(rejection) => {
            state
                .tasks
                .reject(&ctx, Action::Create, None, invalid_body(&rejection))
                .await?
        }
    };
    Ok((StatusCode::CREATED, Json(task)))
}

/// Serves both `/tasks` and `/organizations/{organization_id}/tasks`; by
/// the time it runs the path organization equals the caller's.
async fn list_tasks<R: TaskRepository + 'static>(
    State(state): State<AppState<R>>,
    Extension(ctx): Extension<IdentityContext>,
) -> Result<Json<Vec<Task>>, Problem> {
    Ok(Json(state.tasks.list(&ctx).await?))
}

async fn get_task<R: TaskRepository + 'static>(
    State(state): State<AppState<R>>,
    Extension(ctx): Extension<IdentityContext>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Task>, Problem> {
    let Ok(Path(id)) = id else {
        return Err(invalid_id().into());
    };
    Ok(Json(state.tasks.get(&ctx, id).await?))
}

async fn update_task<R: TaskRepository + 'static>(
    State(state): State<AppState<R>>,
    Extension(ctx): Extension<IdentityContext>,
    id: Result<Path<Uuid>, PathRejection>,
    patch: Result<Json<TaskPatch>, JsonRejection>,
) -> Result<Json<Task>, Problem> {
    let task = match (id, patch) {
        (Ok(Path(id)), Ok(Json(patch))) => state.tasks.update(&ctx, id, patch).await?,
        (Err(_), _) => {
            state
                .tasks
                .reject(&ctx, Action::Update, None, invalid_id())
                .await?
        }
        (Ok(Path(id)), Err(rejection)) => {
            state
                .tasks
                .reject(&ctx, Action::Update, Some(id), invalid_body(&rejection))
                .await?
        }
    };
    Ok(Json(task))
}

async fn delete_task<R: TaskRepository + 'static>(
    State(state): State<AppState<R>>,
    Extension(ctx): Extension<IdentityContext>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<StatusCode, Problem> {
    match id {
        Ok(Path(id)) => state.tasks.delete(&ctx, id).await?,
        Err(_) => {
            state
                .tasks
                .reject::<()>(&ctx, Action::Delete, None, invalid_id())
                .await?;
        }
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn reorder_tasks<R: TaskRepository + 'static>(
    State(state): State<AppState<R>>,
    Extension(ctx): Extension<IdentityContext>,
    entries: Result<Json<Vec<ReorderEntry>>, JsonRejection>,
) -> Result<StatusCode, Problem> {
    match entries {
        Ok(Json(entries)) => state.tasks.reorder(&ctx, entries).await?,
        Err(rejection) => {
            state
                .tasks
                .reject::<()>(&ctx, Action::Update, None, invalid_body(&rejection))
                .await?;
        }
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn list_audit_log<R: TaskRepository + 'static>(
    State(state): State<AppState<R>>,
    Extension(ctx): Extension<IdentityContext>,
) -> Result<Json<Vec<AuditRecord>>, Problem> {
    Ok(Json(state.audit.list_for_organization(&ctx).await?))
}

async fn list_actor_audit_log<R: TaskRepository + 'static>(
    State(state): State<AppState<R>>,
    Extension(ctx): Extension<IdentityContext>,
    subject_id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Vec<AuditRecord>>, Problem> {
    let Ok(Path(subject_id)) = subject_id else {
        return Err(invalid_id().into());
    };
    Ok(Json(state.audit.list_for_actor(&ctx, subject_id).await?))
}

/// The raw path value is not echoed.
fn invalid_id() -> DomainError {
    DomainError::validation(TaskFields::ID, "must be a UUID")
}

fn invalid_body(rejection: &JsonRejection) -> DomainError {
    DomainError::validation(TaskFields::BODY, rejection.body_text())
}
