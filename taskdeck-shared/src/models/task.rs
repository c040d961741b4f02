/// Task model and database operations
///
/// Tasks are scoped to a project and never carry an access list of their
/// own — authorization always goes through the parent project's
/// memberships. The `status` column is caller-supplied text; the
/// conventional board vocabulary is `todo`, `in-progress`, and `done`, but
/// the store does not constrain it.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE tasks (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     project_id UUID NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
///     title VARCHAR(255) NOT NULL,
///     description TEXT,
///     status VARCHAR(64) NOT NULL,
///     assignee_id UUID REFERENCES users(id),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use taskdeck_shared::models::task::{CreateTask, Task};
/// # use sqlx::PgPool;
/// # use uuid::Uuid;
/// # async fn example(pool: PgPool, project_id: Uuid) -> Result<(), sqlx::Error> {
/// let task = Task::create(&pool, CreateTask {
///     project_id,
///     title: "Fix bug".to_string(),
///     description: None,
///     status: "todo".to_string(),
///     assignee_id: None,
/// }).await?;
///
/// let board = Task::list_for_project(&pool, project_id).await?;
/// assert_eq!(board.len(), 1);
/// # Ok(())
/// # }
/// ```
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use super::user::UserRef;

/// Task record
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Unique task ID
    pub id: Uuid,

    /// Parent project
    pub project_id: Uuid,

    /// Task title
    pub title: String,

    /// Optional free-form description
    pub description: Option<String>,

    /// Board status (free text; conventionally todo | in-progress | done)
    pub status: String,

    /// Assigned user, if any; assignees are not required to be members
    pub assignee_id: Option<Uuid>,

    /// When the task was created
    pub created_at: DateTime<Utc>,
}

/// Task with its assignee's identity resolved
#[derive(Debug, Clone, Serialize)]
pub struct TaskWithAssignee {
    /// Unique task ID
    pub id: Uuid,

    /// Parent project
    pub project_id: Uuid,

    /// Task title
    pub title: String,

    /// Optional free-form description
    pub description: Option<String>,

    /// Board status
    pub status: String,

    /// Assigned user ID, if any
    pub assignee_id: Option<Uuid>,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// Resolved assignee identity, if assigned
    pub assignee: Option<UserRef>,
}

#[derive(sqlx::FromRow)]
struct TaskAssigneeRow {
    id: Uuid,
    project_id: Uuid,
    title: String,
    description: Option<String>,
    status: String,
    assignee_id: Option<Uuid>,
    created_at: DateTime<Utc>,
    assignee_email: Option<String>,
}

impl From<TaskAssigneeRow> for TaskWithAssignee {
    fn from(row: TaskAssigneeRow) -> Self {
        let assignee = match (row.assignee_id, row.assignee_email) {
            (Some(id), Some(email)) => Some(UserRef { id, email }),
            _ => None,
        };

        TaskWithAssignee {
            id: row.id,
            project_id: row.project_id,
            title: row.title,
            description: row.description,
            status: row.status,
            assignee_id: row.assignee_id,
            created_at: row.created_at,
            assignee,
        }
    }
}

/// Input for creating a new task
#[derive(Debug, Clone)]
pub struct CreateTask {
    /// Parent project
    pub project_id: Uuid,

    /// Task title
    pub title: String,

    /// Optional description
    pub description: Option<String>,

    /// Board status
    pub status: String,

    /// Optional assignee
    pub assignee_id: Option<Uuid>,
}

/// Sparse patch for a task
///
/// Only fields that were present in the request are applied; the
/// double-`Option` fields distinguish "leave unchanged" (outer `None`) from
/// "set to null" (`Some(None)`), so `"assignee_id": null` explicitly clears
/// an assignment.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskPatch {
    /// New title
    pub title: Option<String>,

    /// New description; `Some(None)` clears it
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,

    /// New status
    pub status: Option<String>,

    /// New assignee; `Some(None)` clears the assignment
    #[serde(default, deserialize_with = "double_option")]
    pub assignee_id: Option<Option<Uuid>>,
}

fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: serde::Deserialize<'de>,
    D: Deserializer<'de>,
{
    // A present-but-null field reaches this deserializer; an absent field
    // falls back to the outer default of None.
    Option::<T>::deserialize(deserializer).map(Some)
}

impl TaskPatch {
    /// True when the patch would change nothing
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.assignee_id.is_none()
    }
}

impl Task {
    /// Creates a new task
    ///
    /// # Errors
    ///
    /// Returns an error on foreign key violation (unknown project or
    /// assignee) or connection failure.
    pub async fn create(pool: &PgPool, data: CreateTask) -> Result<Self, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (project_id, title, description, status, assignee_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, project_id, title, description, status, assignee_id, created_at
            "#,
        )
        .bind(data.project_id)
        .bind(data.title)
        .bind(data.description)
        .bind(data.status)
        .bind(data.assignee_id)
        .fetch_one(pool)
        .await?;

        Ok(task)
    }

    /// Finds a task by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, project_id, title, description, status, assignee_id, created_at
            FROM tasks
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Lists a project's tasks with resolved assignees
    ///
    /// Ordered by creation time ascending (board order). Generic over the
    /// executor so the export snapshot can run it inside its read
    /// transaction.
    pub async fn list_for_project<'e, E>(
        executor: E,
        project_id: Uuid,
    ) -> Result<Vec<TaskWithAssignee>, sqlx::Error>
    where
        E: sqlx::PgExecutor<'e>,
    {
        let rows = sqlx::query_as::<_, TaskAssigneeRow>(
            r#"
            SELECT t.id, t.project_id, t.title, t.description, t.status,
                   t.assignee_id, t.created_at, u.email AS assignee_email
            FROM tasks t
            LEFT JOIN users u ON u.id = t.assignee_id
            WHERE t.project_id = $1
            ORDER BY t.created_at ASC
            "#,
        )
        .bind(project_id)
        .fetch_all(executor)
        .await?;

        Ok(rows.into_iter().map(TaskWithAssignee::from).collect())
    }

    /// Applies a sparse patch to a task
    ///
    /// Builds the UPDATE from the fields actually present in the patch and
    /// leaves every other column untouched.
    ///
    /// # Returns
    ///
    /// The updated task, or `None` if the task does not exist.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        patch: TaskPatch,
    ) -> Result<Option<Self>, sqlx::Error> {
        if patch.is_empty() {
            return Self::find_by_id(pool, id).await;
        }

        let mut assignments: Vec<String> = Vec::new();
        let mut bind_count = 1;

        if patch.title.is_some() {
            bind_count += 1;
            assignments.push(format!("title = ${}", bind_count));
        }
        if patch.description.is_some() {
            bind_count += 1;
            assignments.push(format!("description = ${}", bind_count));
        }
        if patch.status.is_some() {
            bind_count += 1;
            assignments.push(format!("status = ${}", bind_count));
        }
        if patch.assignee_id.is_some() {
            bind_count += 1;
            assignments.push(format!("assignee_id = ${}", bind_count));
        }

        let query = format!(
            "UPDATE tasks SET {} WHERE id = $1 \
             RETURNING id, project_id, title, description, status, assignee_id, created_at",
            assignments.join(", ")
        );

        let mut q = sqlx::query_as::<_, Task>(&query).bind(id);

        if let Some(title) = patch.title {
            q = q.bind(title);
        }
        if let Some(description) = patch.description {
            q = q.bind(description);
        }
        if let Some(status) = patch.status {
            q = q.bind(status);
        }
        if let Some(assignee_id) = patch.assignee_id {
            q = q.bind(assignee_id);
        }

        let task = q.fetch_optional(pool).await?;

        Ok(task)
    }

    /// Deletes a task
    ///
    /// # Returns
    ///
    /// True if a row was deleted, false if the task was already absent.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patch_is_empty() {
        assert!(TaskPatch::default().is_empty());

        let patch = TaskPatch {
            status: Some("done".to_string()),
            ..Default::default()
        };
        assert!(!patch.is_empty());
    }

    #[test]
    fn test_patch_absent_field_leaves_value_unchanged() {
        let patch: TaskPatch = serde_json::from_str(r#"{"status": "done"}"#).unwrap();

        assert_eq!(patch.status.as_deref(), Some("done"));
        assert!(patch.title.is_none());
        assert!(patch.description.is_none());
        assert!(patch.assignee_id.is_none());
    }

    #[test]
    fn test_patch_null_assignee_clears_assignment() {
        let patch: TaskPatch = serde_json::from_str(r#"{"assignee_id": null}"#).unwrap();

        assert_eq!(patch.assignee_id, Some(None));
        assert!(!patch.is_empty());
    }

    #[test]
    fn test_patch_set_assignee() {
        let id = Uuid::new_v4();
        let patch: TaskPatch =
            serde_json::from_str(&format!(r#"{{"assignee_id": "{}"}}"#, id)).unwrap();

        assert_eq!(patch.assignee_id, Some(Some(id)));
    }

    #[test]
    fn test_unassigned_task_resolves_no_assignee() {
        let row = TaskAssigneeRow {
            id: Uuid::new_v4(),
            project_id: Uuid::new_v4(),
            title: "Fix bug".to_string(),
            description: None,
            status: "todo".to_string(),
            assignee_id: None,
            created_at: Utc::now(),
            assignee_email: None,
        };

        let task = TaskWithAssignee::from(row);
        assert!(task.assignee.is_none());
    }

    #[test]
    fn test_assigned_task_resolves_assignee() {
        let assignee_id = Uuid::new_v4();
        let row = TaskAssigneeRow {
            id: Uuid::new_v4(),
            project_id: Uuid::new_v4(),
            title: "Fix bug".to_string(),
            description: Some("repro steps".to_string()),
            status: "in-progress".to_string(),
            assignee_id: Some(assignee_id),
            created_at: Utc::now(),
            assignee_email: Some("dev@example.com".to_string()),
        };

        let task = TaskWithAssignee::from(row);
        let assignee = task.assignee.unwrap();
        assert_eq!(assignee.id, assignee_id);
        assert_eq!(assignee.email, "dev@example.com");
    }

    // Integration tests for database operations are in taskdeck-api/tests/.
}
