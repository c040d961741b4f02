/// Project endpoints
///
/// # Endpoints
///
/// - `POST /api/projects` - Create a project (caller becomes owner+member)
/// - `GET /api/projects` - List the caller's projects
/// - `GET /api/projects/:project_id` - Fetch one project (members only)
/// - `DELETE /api/projects/:project_id` - Delete a project (owner only,
///   idempotent)
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use taskdeck_shared::{
    auth::authorization::{require_member, require_owner, AuthzError},
    models::project::Project,
};

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::Identity,
};

/// Create project request
#[derive(Debug, Deserialize)]
pub struct CreateProjectRequest {
    /// Project name
    pub name: Option<String>,
}

/// Create a project
///
/// The project row and the owner's membership are inserted in one
/// transaction, so every observable project has its owner as a member.
///
/// # Errors
///
/// - `400 Bad Request`: missing or empty name
/// - `401 Unauthorized`: no valid token
pub async fn create_project(
    State(state): State<AppState>,
    identity: Identity,
    Json(req): Json<CreateProjectRequest>,
) -> ApiResult<(StatusCode, Json<Project>)> {
    let name = req
        .name
        .filter(|name| !name.is_empty())
        .ok_or_else(|| ApiError::InvalidInput("Project name is required".to_string()))?;

    let project = Project::create_with_owner(&state.db, &name, identity.user_id).await?;

    tracing::info!(project_id = %project.id, owner_id = %identity.user_id, "Project created");

    Ok((StatusCode::CREATED, Json(project)))
}

/// List the caller's projects
///
/// Joined through memberships, newest first — the caller sees every
/// project they belong to, owned or not.
pub async fn list_projects(
    State(state): State<AppState>,
    identity: Identity,
) -> ApiResult<Json<Vec<Project>>> {
    let projects = Project::list_for_user(&state.db, identity.user_id).await?;

    Ok(Json(projects))
}

/// Fetch a single project
///
/// # Errors
///
/// - `403 Forbidden`: caller is not a member (also for unknown project
///   IDs, so non-members learn nothing)
/// - `404 Not Found`: member of a project that has since vanished
pub async fn get_project(
    State(state): State<AppState>,
    identity: Identity,
    Path(project_id): Path<Uuid>,
) -> ApiResult<Json<Project>> {
    require_member(&state.db, project_id, identity.user_id).await?;

    let project = Project::find_by_id(&state.db, project_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;

    Ok(Json(project))
}

/// Delete a project
///
/// Owner only; memberships and tasks cascade. Deleting an absent project
/// reports success so client retries stay trivial.
///
/// # Errors
///
/// - `403 Forbidden`: caller is a non-owner
pub async fn delete_project(
    State(state): State<AppState>,
    identity: Identity,
    Path(project_id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    match require_owner(&state.db, project_id, identity.user_id).await {
        Ok(_) => {
            Project::delete(&state.db, project_id).await?;
            tracing::info!(project_id = %project_id, "Project deleted");
            Ok(StatusCode::NO_CONTENT)
        }
        // Idempotent: an already-absent project is a successful delete.
        Err(AuthzError::ProjectNotFound) => Ok(StatusCode::NO_CONTENT),
        Err(err) => Err(err.into()),
    }
}
