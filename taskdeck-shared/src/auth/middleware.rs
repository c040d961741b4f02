/// Request authentication middleware
///
/// Provides the gatekeeping layer applied to the entire project API
/// prefix: it reads the session cookie, validates the token, and rejects
/// the request with 401 before any handler runs. Handlers perform their
/// own token verification as well — this layer is a deliberate
/// defense-in-depth duplicate, so no route under the prefix can be reached
/// unauthenticated even if a handler forgets its check.
///
/// On success the authenticated identity is stored in the request
/// extensions as [`AuthContext`].
///
/// # Example
///
/// ```no_run
/// use axum::{middleware, routing::get, Router};
/// use taskdeck_shared::auth::middleware::cookie_auth_middleware;
///
/// let secret = "a-signing-secret-of-at-least-32-bytes!!".to_string();
/// let app: Router = Router::new()
///     .route("/api/projects", get(|| async { "OK" }))
///     .layer(middleware::from_fn(move |req, next| {
///         cookie_auth_middleware(secret.clone(), req, next)
///     }));
/// ```
use axum::{
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use super::{cookie, jwt};

/// Authenticated identity stored in request extensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthContext {
    /// Verified user ID from the token's `sub` claim
    pub user_id: Uuid,
}

/// Error type for the authentication middleware
///
/// Both variants map to 401. Expired and malformed tokens are reported
/// identically: the caller only learns that authentication failed.
#[derive(Debug, PartialEq, Eq)]
pub enum AuthError {
    /// No session cookie on the request
    MissingToken,

    /// Session cookie present but the token failed validation
    InvalidToken,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let message = match self {
            AuthError::MissingToken => "Authentication failed: no token provided",
            AuthError::InvalidToken => "Authentication failed: invalid token",
        };

        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "unauthenticated", "message": message })),
        )
            .into_response()
    }
}

/// Cookie-based authentication middleware
///
/// Validates the session token from the `token` cookie and injects
/// [`AuthContext`] into the request extensions.
///
/// # Errors
///
/// Returns 401 if the cookie is missing or the token fails validation
/// (bad signature, malformed, or expired).
pub async fn cookie_auth_middleware(
    secret: String,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let jar = CookieJar::from_headers(req.headers());
    let token = cookie::session_token(&jar).ok_or(AuthError::MissingToken)?;

    let claims = jwt::validate_token(&token, &secret).map_err(|_| AuthError::InvalidToken)?;

    req.extensions_mut().insert(AuthContext {
        user_id: claims.sub,
    });

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_error_responses_are_401() {
        let response = AuthError::MissingToken.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = AuthError::InvalidToken.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_auth_context_carries_user_id() {
        let user_id = Uuid::new_v4();
        let context = AuthContext { user_id };
        assert_eq!(context.user_id, user_id);
    }
}
