/// Task board endpoints
///
/// # Endpoints
///
/// - `GET /api/projects/:project_id/tasks` - List the board (members only)
/// - `POST /api/projects/:project_id/tasks` - Create a task (members only)
/// - `PATCH /api/projects/:project_id/tasks/:task_id` - Sparse update
/// - `DELETE /api/projects/:project_id/tasks/:task_id` - Delete (idempotent)
///
/// Any member may create, update, or delete any task in the project —
/// there is no creator or assignee restriction. For task-scoped
/// operations, authorization runs against the project resolved from the
/// task row itself, never against the path.
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use taskdeck_shared::{
    auth::authorization::{require_member, require_task_member},
    models::task::{CreateTask, Task, TaskPatch, TaskWithAssignee},
};

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::Identity,
};

/// Create task request
#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    /// Task title
    pub title: Option<String>,

    /// Optional description
    pub description: Option<String>,

    /// Board status (free text; conventionally todo | in-progress | done)
    pub status: Option<String>,

    /// Optional assignee
    pub assignee_id: Option<Uuid>,
}

/// List a project's tasks
///
/// Board order (creation time ascending), assignees resolved to
/// `{id, email}`.
///
/// # Errors
///
/// - `403 Forbidden`: caller is not a member
pub async fn list_tasks(
    State(state): State<AppState>,
    identity: Identity,
    Path(project_id): Path<Uuid>,
) -> ApiResult<Json<Vec<TaskWithAssignee>>> {
    require_member(&state.db, project_id, identity.user_id).await?;

    let tasks = Task::list_for_project(&state.db, project_id).await?;

    Ok(Json(tasks))
}

/// Create a task
///
/// # Errors
///
/// - `400 Bad Request`: missing title or status
/// - `403 Forbidden`: caller is not a member
pub async fn create_task(
    State(state): State<AppState>,
    identity: Identity,
    Path(project_id): Path<Uuid>,
    Json(req): Json<CreateTaskRequest>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    require_member(&state.db, project_id, identity.user_id).await?;

    let (title, status) = match (req.title, req.status) {
        (Some(title), Some(status)) if !title.is_empty() && !status.is_empty() => {
            (title, status)
        }
        _ => {
            return Err(ApiError::InvalidInput(
                "Title and status are required".to_string(),
            ))
        }
    };

    let task = Task::create(
        &state.db,
        CreateTask {
            project_id,
            title,
            description: req.description,
            status,
            assignee_id: req.assignee_id,
        },
    )
    .await?;

    tracing::info!(task_id = %task.id, project_id = %project_id, "Task created");

    Ok((StatusCode::CREATED, Json(task)))
}

/// Apply a sparse patch to a task
///
/// Only fields present in the body change; `"assignee_id": null`
/// explicitly clears the assignment.
///
/// # Errors
///
/// - `403 Forbidden`: caller is not a member of the task's project
/// - `404 Not Found`: unknown task
pub async fn update_task(
    State(state): State<AppState>,
    identity: Identity,
    Path((_project_id, task_id)): Path<(Uuid, Uuid)>,
    Json(patch): Json<TaskPatch>,
) -> ApiResult<Json<Task>> {
    require_task_member(&state.db, task_id, identity.user_id).await?;

    let task = Task::update(&state.db, task_id, patch)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    Ok(Json(task))
}

/// Delete a task
///
/// Deleting an absent task reports success, matching project deletion's
/// idempotent semantics.
///
/// # Errors
///
/// - `403 Forbidden`: caller is not a member of the task's project
pub async fn delete_task(
    State(state): State<AppState>,
    identity: Identity,
    Path((_project_id, task_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<StatusCode> {
    let Some(task) = Task::find_by_id(&state.db, task_id).await? else {
        return Ok(StatusCode::NO_CONTENT);
    };

    require_member(&state.db, task.project_id, identity.user_id).await?;

    Task::delete(&state.db, task_id).await?;

    tracing::info!(task_id = %task_id, "Task deleted");

    Ok(StatusCode::NO_CONTENT)
}
