//! # Taskdeck Shared Library
//!
//! This crate contains the domain layer shared by the Taskdeck API server:
//! database models, authentication/authorization utilities, and the
//! connection pool and migration runner.
//!
//! ## Module Organization
//!
//! - `models`: Database models and their CRUD operations
//! - `auth`: Passwords, session tokens, cookies, and the authorization gate
//! - `db`: Connection pool management and migrations

pub mod auth;
pub mod db;
pub mod models;

/// Current version of the Taskdeck shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
