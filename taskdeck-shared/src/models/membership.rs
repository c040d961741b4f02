/// Membership model and database operations
///
/// A membership row is the authorization ground truth: it asserts that
/// `user_id` may access the resources of `project_id`. It is a plain join
/// entity with no role attached — the only privileged role in the system is
/// project ownership, which lives on the project row itself.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE memberships (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     user_id UUID NOT NULL REFERENCES users(id),
///     project_id UUID NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     CONSTRAINT memberships_user_id_project_id_key UNIQUE (user_id, project_id)
/// );
/// ```
///
/// Uniqueness of the (user_id, project_id) pair is enforced by the database
/// constraint, not by a check-then-insert sequence: two concurrent invites
/// for the same user end with exactly one membership row and one
/// unique-violation error, which the API surfaces as Conflict.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use super::user::UserRef;

/// Membership record linking a user to a project
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Membership {
    /// Unique membership ID
    pub id: Uuid,

    /// Member's user ID
    pub user_id: Uuid,

    /// Project the membership grants access to
    pub project_id: Uuid,

    /// When the membership was created
    pub created_at: DateTime<Utc>,
}

/// Membership with the member's identity resolved, as emitted by exports
#[derive(Debug, Clone, Serialize)]
pub struct MembershipWithUser {
    /// Unique membership ID
    pub id: Uuid,

    /// Member's user ID
    pub user_id: Uuid,

    /// Project the membership grants access to
    pub project_id: Uuid,

    /// When the membership was created
    pub created_at: DateTime<Utc>,

    /// Resolved member identity
    pub user: UserRef,
}

#[derive(sqlx::FromRow)]
struct MembershipUserRow {
    id: Uuid,
    user_id: Uuid,
    project_id: Uuid,
    created_at: DateTime<Utc>,
    email: String,
}

impl From<MembershipUserRow> for MembershipWithUser {
    fn from(row: MembershipUserRow) -> Self {
        MembershipWithUser {
            id: row.id,
            user_id: row.user_id,
            project_id: row.project_id,
            created_at: row.created_at,
            user: UserRef {
                id: row.user_id,
                email: row.email,
            },
        }
    }
}

impl Membership {
    /// Adds a user to a project
    ///
    /// # Errors
    ///
    /// Returns an error if the pair already exists (unique constraint
    /// violation, surfaced as Conflict at the API boundary), if either
    /// entity is missing (foreign key violation), or on connection failure.
    pub async fn create(
        pool: &PgPool,
        project_id: Uuid,
        user_id: Uuid,
    ) -> Result<Self, sqlx::Error> {
        let membership = sqlx::query_as::<_, Membership>(
            r#"
            INSERT INTO memberships (user_id, project_id)
            VALUES ($1, $2)
            RETURNING id, user_id, project_id, created_at
            "#,
        )
        .bind(user_id)
        .bind(project_id)
        .fetch_one(pool)
        .await?;

        Ok(membership)
    }

    /// Checks whether a user is a member of a project
    ///
    /// This is the authorization predicate applied by nearly every
    /// project-scoped operation.
    pub async fn exists(
        pool: &PgPool,
        project_id: Uuid,
        user_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM memberships
                WHERE project_id = $1 AND user_id = $2
            )
            "#,
        )
        .bind(project_id)
        .bind(user_id)
        .fetch_one(pool)
        .await?;

        Ok(exists)
    }

    /// Lists the members of a project as `{id, email}` records
    ///
    /// Ordered by membership creation time (insertion order).
    pub async fn list_members(
        pool: &PgPool,
        project_id: Uuid,
    ) -> Result<Vec<UserRef>, sqlx::Error> {
        let members = sqlx::query_as::<_, UserRef>(
            r#"
            SELECT u.id, u.email
            FROM memberships m
            JOIN users u ON u.id = m.user_id
            WHERE m.project_id = $1
            ORDER BY m.created_at ASC
            "#,
        )
        .bind(project_id)
        .fetch_all(pool)
        .await?;

        Ok(members)
    }

    /// Lists a project's memberships with resolved member identities
    ///
    /// Used by the export snapshot; generic over the executor so it can run
    /// inside the snapshot's read transaction.
    pub async fn list_with_users<'e, E>(
        executor: E,
        project_id: Uuid,
    ) -> Result<Vec<MembershipWithUser>, sqlx::Error>
    where
        E: sqlx::PgExecutor<'e>,
    {
        let rows = sqlx::query_as::<_, MembershipUserRow>(
            r#"
            SELECT m.id, m.user_id, m.project_id, m.created_at, u.email
            FROM memberships m
            JOIN users u ON u.id = m.user_id
            WHERE m.project_id = $1
            ORDER BY m.created_at ASC
            "#,
        )
        .bind(project_id)
        .fetch_all(executor)
        .await?;

        Ok(rows.into_iter().map(MembershipWithUser::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_membership_with_user_resolution() {
        let user_id = Uuid::new_v4();
        let row = MembershipUserRow {
            id: Uuid::new_v4(),
            user_id,
            project_id: Uuid::new_v4(),
            created_at: Utc::now(),
            email: "member@example.com".to_string(),
        };

        let resolved = MembershipWithUser::from(row);
        assert_eq!(resolved.user.id, user_id);
        assert_eq!(resolved.user.email, "member@example.com");
    }

    // Integration tests for database operations are in taskdeck-api/tests/.
}
