/// Authorization gate
///
/// Decides ALLOW/DENY for an (identity, project, action) triple once the
/// identity has been authenticated. Two tiers exist:
///
/// 1. **Membership**: nearly every project-scoped operation requires a
///    membership row for (user, project).
/// 2. **Ownership**: inviting a member and deleting a project require the
///    requester to be the project's owner — a distinct failure from plain
///    non-membership.
///
/// Task-scoped operations resolve the task's parent project first and
/// apply the membership check against it; a task never carries an access
/// list of its own.
///
/// # Example
///
/// ```no_run
/// use taskdeck_shared::auth::authorization::{require_member, require_owner};
/// # use sqlx::PgPool;
/// # use uuid::Uuid;
/// # async fn example(pool: PgPool, project_id: Uuid, user_id: Uuid) -> Result<(), Box<dyn std::error::Error>> {
/// // Any member may read the board.
/// require_member(&pool, project_id, user_id).await?;
///
/// // Only the owner may invite.
/// let project = require_owner(&pool, project_id, user_id).await?;
/// # Ok(())
/// # }
/// ```
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{membership::Membership, project::Project, task::Task};

/// Error type for authorization checks
#[derive(Debug, thiserror::Error)]
pub enum AuthzError {
    /// Valid identity without a membership for the project
    #[error("You are not a member of this project")]
    NotMember,

    /// Valid membership but the operation is owner-restricted
    #[error("Only the project owner can perform this action")]
    NotOwner,

    /// Referenced project does not exist
    #[error("Project not found")]
    ProjectNotFound,

    /// Referenced task does not exist
    #[error("Task not found")]
    TaskNotFound,

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Requires that a user is a member of a project
///
/// # Errors
///
/// Returns `AuthzError::NotMember` when no membership row exists —
/// including when the project itself does not exist, so non-members learn
/// nothing about which project IDs are real.
pub async fn require_member(
    pool: &PgPool,
    project_id: Uuid,
    user_id: Uuid,
) -> Result<(), AuthzError> {
    if !Membership::exists(pool, project_id, user_id).await? {
        return Err(AuthzError::NotMember);
    }

    Ok(())
}

/// Requires that a user is the owner of a project
///
/// # Returns
///
/// The project record, so callers that need it avoid a second lookup.
///
/// # Errors
///
/// Returns `ProjectNotFound` for an absent project, `NotOwner` when the
/// requester is not the owner.
pub async fn require_owner(
    pool: &PgPool,
    project_id: Uuid,
    user_id: Uuid,
) -> Result<Project, AuthzError> {
    let project = Project::find_by_id(pool, project_id)
        .await?
        .ok_or(AuthzError::ProjectNotFound)?;

    if project.owner_id != user_id {
        return Err(AuthzError::NotOwner);
    }

    Ok(project)
}

/// Requires that a user is a member of a task's parent project
///
/// Resolves the task first, then applies the membership check against the
/// task's own `project_id` — the path a client supplied is never trusted
/// for authorization.
///
/// # Returns
///
/// The task record.
///
/// # Errors
///
/// Returns `TaskNotFound` for an absent task, `NotMember` when the
/// requester does not belong to the parent project.
pub async fn require_task_member(
    pool: &PgPool,
    task_id: Uuid,
    user_id: Uuid,
) -> Result<Task, AuthzError> {
    let task = Task::find_by_id(pool, task_id)
        .await?
        .ok_or(AuthzError::TaskNotFound)?;

    require_member(pool, task.project_id, user_id).await?;

    Ok(task)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authz_error_display() {
        assert!(AuthzError::NotMember.to_string().contains("not a member"));
        assert!(AuthzError::NotOwner.to_string().contains("owner"));
        assert!(AuthzError::ProjectNotFound
            .to_string()
            .contains("Project not found"));
        assert!(AuthzError::TaskNotFound
            .to_string()
            .contains("Task not found"));
    }

    // Membership and ownership checks against real rows are covered by the
    // integration tests in taskdeck-api/tests/.
}
