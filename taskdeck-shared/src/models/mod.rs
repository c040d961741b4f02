/// Database models for Taskdeck
///
/// Each model owns its CRUD operations as associated functions over a
/// `PgPool`.
///
/// # Models
///
/// - `user`: User accounts (credential store)
/// - `project`: Projects, each with exactly one owner
/// - `membership`: The user-project join entity that grounds authorization
/// - `task`: Board tasks scoped to a project
pub mod membership;
pub mod project;
pub mod task;
pub mod user;
