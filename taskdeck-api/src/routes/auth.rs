/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /api/auth/register` - Register a new user, set the session cookie
/// - `POST /api/auth/login` - Authenticate, set the session cookie
///
/// Both endpoints attach the session token to the response as an
/// HTTP-only, SameSite=Strict cookie; the token itself never appears in a
/// response body.
use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use taskdeck_shared::{
    auth::{cookie, jwt, password},
    models::user::{CreateUser, User},
};

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};

/// Register request
///
/// Fields are optional so missing ones surface as 400, not as a body
/// deserialization failure.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    /// Password
    pub password: Option<String>,
}

/// Login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Email address
    pub email: Option<String>,

    /// Password
    pub password: Option<String>,
}

/// Response body for both register and login
#[derive(Debug, Serialize)]
pub struct AuthUserResponse {
    /// User ID
    pub id: Uuid,

    /// Email address
    pub email: String,
}

fn required_credentials(
    email: &Option<String>,
    password: &Option<String>,
) -> Result<(String, String), ApiError> {
    match (email, password) {
        (Some(email), Some(password)) if !email.is_empty() && !password.is_empty() => {
            Ok((email.clone(), password.clone()))
        }
        _ => Err(ApiError::InvalidInput(
            "Email and password are required".to_string(),
        )),
    }
}

/// Register a new user
///
/// # Endpoint
///
/// ```text
/// POST /api/auth/register
/// Content-Type: application/json
///
/// { "email": "user@example.com", "password": "secret" }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: missing email or password, or invalid email format
/// - `409 Conflict`: email already registered
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, CookieJar, Json<AuthUserResponse>)> {
    let (email, plaintext) = required_credentials(&req.email, &req.password)?;
    req.validate()?;

    if User::find_by_email(&state.db, &email).await?.is_some() {
        return Err(ApiError::Conflict(
            "A user with this email already exists".to_string(),
        ));
    }

    let password_hash = password::hash_password(&plaintext)?;

    // The unique constraint on users.email backs this up under races: a
    // concurrent duplicate registration fails with Conflict here.
    let user = User::create(
        &state.db,
        CreateUser {
            email,
            password_hash,
        },
    )
    .await?;

    let token = jwt::issue_token(user.id, state.jwt_secret())?;
    let jar = jar.add(cookie::session_cookie(token, state.production()));

    tracing::info!(user_id = %user.id, "User registered");

    Ok((
        StatusCode::CREATED,
        jar,
        Json(AuthUserResponse {
            id: user.id,
            email: user.email,
        }),
    ))
}

/// Login
///
/// # Endpoint
///
/// ```text
/// POST /api/auth/login
/// Content-Type: application/json
///
/// { "email": "user@example.com", "password": "secret" }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: missing email or password
/// - `401 Unauthorized`: unknown email or wrong password (identical
///   responses, so the endpoint does not reveal which)
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> ApiResult<(CookieJar, Json<AuthUserResponse>)> {
    let (email, plaintext) = required_credentials(&req.email, &req.password)?;

    let user = User::find_by_email(&state.db, &email)
        .await?
        .ok_or_else(|| ApiError::Unauthenticated("Invalid email or password".to_string()))?;

    if !password::verify_password(&plaintext, &user.password_hash)? {
        return Err(ApiError::Unauthenticated(
            "Invalid email or password".to_string(),
        ));
    }

    let token = jwt::issue_token(user.id, state.jwt_secret())?;
    let jar = jar.add(cookie::session_cookie(token, state.production()));

    tracing::info!(user_id = %user.id, "User logged in");

    Ok((
        jar,
        Json(AuthUserResponse {
            id: user.id,
            email: user.email,
        }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_credentials_present() {
        let result = required_credentials(
            &Some("a@x.com".to_string()),
            &Some("pw1".to_string()),
        );
        assert_eq!(result.unwrap(), ("a@x.com".to_string(), "pw1".to_string()));
    }

    #[test]
    fn test_required_credentials_missing_or_empty() {
        assert!(required_credentials(&None, &Some("pw".to_string())).is_err());
        assert!(required_credentials(&Some("a@x.com".to_string()), &None).is_err());
        assert!(
            required_credentials(&Some("".to_string()), &Some("pw".to_string())).is_err()
        );
        assert!(
            required_credentials(&Some("a@x.com".to_string()), &Some("".to_string())).is_err()
        );
    }

    #[test]
    fn test_register_request_email_format() {
        let req = RegisterRequest {
            email: Some("not-an-email".to_string()),
            password: Some("pw1".to_string()),
        };
        assert!(req.validate().is_err());

        let req = RegisterRequest {
            email: Some("a@x.com".to_string()),
            password: Some("pw1".to_string()),
        };
        assert!(req.validate().is_ok());
    }
}
