/// Membership endpoints
///
/// # Endpoints
///
/// - `POST /api/projects/:project_id/members` - Invite a user by email
///   (owner only)
/// - `GET /api/projects/:project_id/members` - List members (members only)
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use taskdeck_shared::{
    auth::authorization::{require_member, require_owner},
    models::{
        membership::Membership,
        user::{User, UserRef},
    },
};

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::Identity,
};

/// Invite member request
#[derive(Debug, Deserialize)]
pub struct InviteMemberRequest {
    /// Email of the user to invite (must already be registered)
    pub email: Option<String>,
}

/// Invite a user to a project
///
/// Only the project owner may invite. The invitee is identified by email
/// and must already have an account.
///
/// # Errors
///
/// - `400 Bad Request`: missing email
/// - `403 Forbidden`: caller is not the owner
/// - `404 Not Found`: unknown project or no user with that email
/// - `409 Conflict`: already a member (enforced by the database constraint,
///   so concurrent duplicate invites cannot both land)
pub async fn invite_member(
    State(state): State<AppState>,
    identity: Identity,
    Path(project_id): Path<Uuid>,
    Json(req): Json<InviteMemberRequest>,
) -> ApiResult<(StatusCode, Json<Membership>)> {
    let email = req
        .email
        .filter(|email| !email.is_empty())
        .ok_or_else(|| ApiError::InvalidInput("User email is required".to_string()))?;

    require_owner(&state.db, project_id, identity.user_id).await?;

    let invitee = User::find_by_email(&state.db, &email)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("User with email {} not found", email)))?;

    let membership = Membership::create(&state.db, project_id, invitee.id).await?;

    tracing::info!(
        project_id = %project_id,
        user_id = %invitee.id,
        "Member invited"
    );

    Ok((StatusCode::CREATED, Json(membership)))
}

/// List a project's members
///
/// Any member may list; results are `{id, email}` records in insertion
/// order.
///
/// # Errors
///
/// - `403 Forbidden`: caller is not a member
pub async fn list_members(
    State(state): State<AppState>,
    identity: Identity,
    Path(project_id): Path<Uuid>,
) -> ApiResult<Json<Vec<UserRef>>> {
    require_member(&state.db, project_id, identity.user_id).await?;

    let members = Membership::list_members(&state.db, project_id).await?;

    Ok(Json(members))
}
