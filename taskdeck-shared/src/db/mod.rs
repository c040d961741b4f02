/// Database layer for Taskdeck
///
/// # Modules
///
/// - `pool`: PostgreSQL connection pool management with a startup health check
/// - `migrations`: Embedded migration runner
///
/// Models live in the `models` module at the crate root.
pub mod migrations;
pub mod pool;
