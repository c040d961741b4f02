/// User model and database operations
///
/// Users are created at registration and never deleted. The email column is
/// a plain `VARCHAR UNIQUE`, so lookups are case-sensitive exactly as
/// stored. Passwords are stored as Argon2id digests, never in plaintext.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     email VARCHAR(255) NOT NULL UNIQUE,
///     password_hash VARCHAR(255) NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use taskdeck_shared::models::user::{CreateUser, User};
/// # use sqlx::PgPool;
/// # async fn example(pool: PgPool) -> Result<(), sqlx::Error> {
/// let user = User::create(&pool, CreateUser {
///     email: "user@example.com".to_string(),
///     password_hash: "$argon2id$...".to_string(),
/// }).await?;
///
/// let found = User::find_by_email(&pool, "user@example.com").await?;
/// assert!(found.is_some());
/// # Ok(())
/// # }
/// ```
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// User account record
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID (UUID v4)
    pub id: Uuid,

    /// Email address, unique and case-sensitive as stored
    pub email: String,

    /// Argon2id password digest
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// When the account was created
    pub created_at: DateTime<Utc>,
}

/// Input for creating a new user
#[derive(Debug, Clone)]
pub struct CreateUser {
    /// Email address
    pub email: String,

    /// Argon2id password digest (NOT a plaintext password)
    pub password_hash: String,
}

/// The `{id, email}` projection of a user
///
/// Returned wherever a user identity is resolved for another caller: member
/// lists, task assignees, search results, and export snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserRef {
    /// User ID
    pub id: Uuid,

    /// Email address
    pub email: String,
}

impl User {
    /// Creates a new user
    ///
    /// # Errors
    ///
    /// Returns an error if the email already exists (unique constraint
    /// violation) or the database is unreachable.
    pub async fn create(pool: &PgPool, data: CreateUser) -> Result<Self, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, password_hash)
            VALUES ($1, $2)
            RETURNING id, email, password_hash, created_at
            "#,
        )
        .bind(data.email)
        .bind(data.password_hash)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by email address (exact, case-sensitive match)
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Searches users by email substring
    ///
    /// Returns at most `limit` users whose email contains `fragment`,
    /// excluding `exclude_user` (callers never see themselves in results).
    pub async fn search_by_email(
        pool: &PgPool,
        fragment: &str,
        exclude_user: Uuid,
        limit: i64,
    ) -> Result<Vec<UserRef>, sqlx::Error> {
        let users = sqlx::query_as::<_, UserRef>(
            r#"
            SELECT id, email
            FROM users
            WHERE email LIKE '%' || $1 || '%' AND id <> $2
            ORDER BY email ASC
            LIMIT $3
            "#,
        )
        .bind(fragment)
        .bind(exclude_user)
        .bind(limit)
        .fetch_all(pool)
        .await?;

        Ok(users)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_is_never_serialized() {
        let user = User {
            id: Uuid::new_v4(),
            email: "test@example.com".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            created_at: Utc::now(),
        };

        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("argon2id"));
        assert!(!json.contains("password_hash"));
        assert!(json.contains("test@example.com"));
    }

    #[test]
    fn test_user_ref_serialization() {
        let user_ref = UserRef {
            id: Uuid::new_v4(),
            email: "member@example.com".to_string(),
        };

        let json = serde_json::to_value(&user_ref).unwrap();
        assert_eq!(json["email"], "member@example.com");
        assert!(json["id"].is_string());
    }

    // Integration tests for database operations are in taskdeck-api/tests/.
}
