/// API route handlers
///
/// Organized by resource:
///
/// - `health`: Health check
/// - `auth`: Registration and login
/// - `users`: User search
/// - `projects`: Project lifecycle
/// - `members`: Membership invitations and listing
/// - `tasks`: The task board
/// - `export`: Project export snapshots
pub mod auth;
pub mod export;
pub mod health;
pub mod members;
pub mod projects;
pub mod tasks;
pub mod users;
