/// Session token creation and validation
///
/// Tokens are HS256-signed JWTs carrying the user identity in the `sub`
/// claim, valid for 24 hours from issuance. They are self-contained: the
/// server keeps no session state and there is no revocation mechanism, so
/// a token remains valid until it expires naturally. The signing secret is
/// process-wide configuration loaded once at startup; rotating it
/// invalidates every outstanding token.
///
/// Expiry is validated with zero leeway: a token is accepted one second
/// before its `exp` timestamp and rejected one second after.
///
/// # Example
///
/// ```
/// use taskdeck_shared::auth::jwt::{issue_token, validate_token};
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let user_id = Uuid::new_v4();
/// let secret = "a-signing-secret-of-at-least-32-bytes!!";
///
/// let token = issue_token(user_id, secret)?;
/// let claims = validate_token(&token, secret)?;
/// assert_eq!(claims.sub, user_id);
/// # Ok(())
/// # }
/// ```
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Session token lifetime in seconds (24 hours)
pub const SESSION_TTL_SECONDS: i64 = 86_400;

const ISSUER: &str = "taskdeck";

/// Error type for token operations
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// Failed to create token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Token has expired
    #[error("Token has expired")]
    Expired,

    /// Token failed validation (bad signature, malformed, wrong issuer)
    #[error("Invalid token: {0}")]
    Invalid(String),
}

/// JWT claims for a session token
///
/// - `sub`: user ID
/// - `iss`: always "taskdeck"
/// - `iat` / `nbf` / `exp`: issuance, not-before, and expiry timestamps
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - user ID
    pub sub: Uuid,

    /// Issuer
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Not before (Unix timestamp)
    pub nbf: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Creates claims with the standard 24-hour expiry
    pub fn new(user_id: Uuid) -> Self {
        Self::with_expiration(user_id, Duration::seconds(SESSION_TTL_SECONDS))
    }

    /// Creates claims with a custom expiry
    ///
    /// Used by tests to produce already-expired tokens; production tokens
    /// always go through [`Claims::new`].
    pub fn with_expiration(user_id: Uuid, expires_in: Duration) -> Self {
        let now = Utc::now();

        Self {
            sub: user_id,
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            nbf: now.timestamp(),
            exp: (now + expires_in).timestamp(),
        }
    }

    /// Checks whether the expiry timestamp has passed
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}

/// Signs claims into a token string
///
/// # Errors
///
/// Returns `TokenError::CreateError` if encoding fails.
pub fn create_token(claims: &Claims, secret: &str) -> Result<String, TokenError> {
    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&header, claims, &key)
        .map_err(|e| TokenError::CreateError(format!("Token encoding failed: {}", e)))
}

/// Issues a fresh 24-hour session token for a user
pub fn issue_token(user_id: Uuid, secret: &str) -> Result<String, TokenError> {
    create_token(&Claims::new(user_id), secret)
}

/// Validates a token and extracts its claims
///
/// Verifies the signature, issuer, expiry (zero leeway), and not-before
/// time.
///
/// # Errors
///
/// Returns `TokenError::Expired` for an expired token and
/// `TokenError::Invalid` for anything else (bad signature, malformed,
/// wrong issuer). Callers presenting errors to clients collapse both cases
/// into a single unauthenticated response.
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, TokenError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);
    validation.validate_exp = true;
    validation.validate_nbf = true;
    validation.leeway = 0;

    let token_data = decode::<Claims>(token, &key, &validation).map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
        _ => TokenError::Invalid(format!("Token validation failed: {}", e)),
    })?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    #[test]
    fn test_claims_have_session_ttl() {
        let claims = Claims::new(Uuid::new_v4());

        assert_eq!(claims.iss, "taskdeck");
        assert_eq!(claims.exp - claims.iat, SESSION_TTL_SECONDS);
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_issue_and_validate_roundtrip() {
        let user_id = Uuid::new_v4();

        let token = issue_token(user_id, SECRET).expect("Should create token");
        let claims = validate_token(&token, SECRET).expect("Should validate token");

        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.iss, "taskdeck");
    }

    #[test]
    fn test_validate_with_wrong_secret() {
        let token = issue_token(Uuid::new_v4(), SECRET).unwrap();

        let result = validate_token(&token, "a-different-secret-of-32-bytes-plus!");
        assert!(matches!(result, Err(TokenError::Invalid(_))));
    }

    #[test]
    fn test_validate_expired_token() {
        let claims = Claims::with_expiration(Uuid::new_v4(), Duration::seconds(-3600));
        assert!(claims.is_expired());

        let token = create_token(&claims, SECRET).unwrap();
        let result = validate_token(&token, SECRET);

        assert!(matches!(result, Err(TokenError::Expired)));
    }

    #[test]
    fn test_validate_token_just_inside_expiry() {
        // Accepted shortly before the expiry timestamp; zero leeway means
        // a token expired even two seconds ago is rejected.
        let valid = Claims::with_expiration(Uuid::new_v4(), Duration::seconds(5));
        let token = create_token(&valid, SECRET).unwrap();
        assert!(validate_token(&token, SECRET).is_ok());

        let expired = Claims::with_expiration(Uuid::new_v4(), Duration::seconds(-2));
        let token = create_token(&expired, SECRET).unwrap();
        assert!(matches!(
            validate_token(&token, SECRET),
            Err(TokenError::Expired)
        ));
    }

    #[test]
    fn test_validate_malformed_token() {
        let result = validate_token("not.a.token", SECRET);
        assert!(matches!(result, Err(TokenError::Invalid(_))));

        let result = validate_token("", SECRET);
        assert!(matches!(result, Err(TokenError::Invalid(_))));
    }

    #[test]
    fn test_validate_wrong_issuer() {
        let mut claims = Claims::new(Uuid::new_v4());
        claims.iss = "someone-else".to_string();

        let token = create_token(&claims, SECRET).unwrap();
        assert!(matches!(
            validate_token(&token, SECRET),
            Err(TokenError::Invalid(_))
        ));
    }
}
