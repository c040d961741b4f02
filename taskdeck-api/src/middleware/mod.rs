/// API server middleware
///
/// - `security`: Security response headers applied to every response
pub mod security;
