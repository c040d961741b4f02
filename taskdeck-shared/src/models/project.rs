/// Project model and database operations
///
/// A project has exactly one owner, fixed at creation and never
/// transferred. Creating a project and inserting the owner's membership
/// happen in a single transaction, so an ownerless or membership-less
/// project is never observable. Deleting a project cascades to its
/// memberships and tasks through the foreign keys.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE projects (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name VARCHAR(255) NOT NULL,
///     owner_id UUID NOT NULL REFERENCES users(id),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use taskdeck_shared::models::project::Project;
/// # use sqlx::PgPool;
/// # use uuid::Uuid;
/// # async fn example(pool: PgPool, owner_id: Uuid) -> Result<(), sqlx::Error> {
/// let project = Project::create_with_owner(&pool, "Sprint", owner_id).await?;
/// assert_eq!(project.owner_id, owner_id);
///
/// let mine = Project::list_for_user(&pool, owner_id).await?;
/// assert_eq!(mine.len(), 1);
/// # Ok(())
/// # }
/// ```
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use super::membership::{Membership, MembershipWithUser};
use super::task::{Task, TaskWithAssignee};

/// Project record
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Project {
    /// Unique project ID
    pub id: Uuid,

    /// Project name
    pub name: String,

    /// Owning user, fixed at creation
    pub owner_id: Uuid,

    /// When the project was created
    pub created_at: DateTime<Utc>,
}

/// Deep snapshot of a project's full graph, as produced by the export
/// endpoint
///
/// Materialized in a single read transaction: the project record, every
/// task with its assignee resolved, and every membership with its member
/// resolved.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectSnapshot {
    /// Project ID
    pub id: Uuid,

    /// Project name
    pub name: String,

    /// Owning user
    pub owner_id: Uuid,

    /// When the project was created
    pub created_at: DateTime<Utc>,

    /// All tasks, board order, with resolved assignees
    pub tasks: Vec<TaskWithAssignee>,

    /// All memberships, insertion order, with resolved members
    pub memberships: Vec<MembershipWithUser>,
}

impl Project {
    /// Creates a project together with its owner's membership
    ///
    /// Both inserts run in one transaction: a failure between them persists
    /// neither, so `owner_id` always has a membership row for any project
    /// that exists.
    ///
    /// # Errors
    ///
    /// Returns an error on foreign key violation (unknown owner) or
    /// connection failure.
    pub async fn create_with_owner(
        pool: &PgPool,
        name: &str,
        owner_id: Uuid,
    ) -> Result<Self, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let project = sqlx::query_as::<_, Project>(
            r#"
            INSERT INTO projects (name, owner_id)
            VALUES ($1, $2)
            RETURNING id, name, owner_id, created_at
            "#,
        )
        .bind(name)
        .bind(owner_id)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO memberships (user_id, project_id)
            VALUES ($1, $2)
            "#,
        )
        .bind(owner_id)
        .bind(project.id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(project)
    }

    /// Finds a project by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let project = sqlx::query_as::<_, Project>(
            r#"
            SELECT id, name, owner_id, created_at
            FROM projects
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(project)
    }

    /// Deletes a project
    ///
    /// Memberships and tasks go with it via `ON DELETE CASCADE`.
    ///
    /// # Returns
    ///
    /// True if a row was deleted, false if the project was already absent.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Lists the projects a user is a member of
    ///
    /// Joined through memberships, newest project first. A user sees
    /// exactly the projects they belong to, including ones they do not own.
    pub async fn list_for_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let projects = sqlx::query_as::<_, Project>(
            r#"
            SELECT p.id, p.name, p.owner_id, p.created_at
            FROM projects p
            JOIN memberships m ON m.project_id = p.id
            WHERE m.user_id = $1
            ORDER BY p.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(projects)
    }

    /// Materializes the export snapshot for a project
    ///
    /// All three reads run inside one transaction, so the snapshot reflects
    /// a single point in time.
    ///
    /// # Returns
    ///
    /// The snapshot, or `None` if the project does not exist.
    pub async fn export_snapshot(
        pool: &PgPool,
        id: Uuid,
    ) -> Result<Option<ProjectSnapshot>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let project = sqlx::query_as::<_, Project>(
            r#"
            SELECT id, name, owner_id, created_at
            FROM projects
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(project) = project else {
            return Ok(None);
        };

        let tasks = Task::list_for_project(&mut *tx, id).await?;
        let memberships = Membership::list_with_users(&mut *tx, id).await?;

        tx.commit().await?;

        Ok(Some(ProjectSnapshot {
            id: project.id,
            name: project.name,
            owner_id: project.owner_id,
            created_at: project.created_at,
            tasks,
            memberships,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_serialization_shape() {
        let snapshot = ProjectSnapshot {
            id: Uuid::new_v4(),
            name: "Sprint".to_string(),
            owner_id: Uuid::new_v4(),
            created_at: Utc::now(),
            tasks: vec![],
            memberships: vec![],
        };

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["name"], "Sprint");
        assert!(json["tasks"].as_array().unwrap().is_empty());
        assert!(json["memberships"].as_array().unwrap().is_empty());
    }

    // Integration tests for database operations are in taskdeck-api/tests/.
}
