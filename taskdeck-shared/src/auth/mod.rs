/// Authentication and authorization for Taskdeck
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`jwt`]: Session token creation and validation
/// - [`cookie`]: The `token` session cookie and its attributes
/// - [`middleware`]: The gatekeeping layer for the project API prefix
/// - [`authorization`]: Membership and ownership checks (the authorization
///   gate)
///
/// Every mutating or data-revealing endpoint authenticates first (token
/// from the cookie, verified against the process-wide secret) and
/// authorizes second (membership or ownership lookup), in that order.
/// Identity is derived exclusively from the verified token, never from
/// request bodies.
pub mod authorization;
pub mod cookie;
pub mod jwt;
pub mod middleware;
pub mod password;
