/// Request extractors
///
/// [`Identity`] is the per-handler half of the two-tier authentication
/// check: every protected handler takes it as an argument, which forces
/// token verification before any domain data is touched. The gatekeeping
/// middleware over the project prefix performs the same validation a
/// second time, so neither layer is load-bearing alone.
///
/// # Example
///
/// ```ignore
/// use taskdeck_api::extract::Identity;
///
/// async fn handler(identity: Identity) -> String {
///     format!("Hello, user {}", identity.user_id)
/// }
/// ```
use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::cookie::CookieJar;
use uuid::Uuid;

use taskdeck_shared::auth::{cookie, jwt};

use crate::{app::AppState, error::ApiError};

/// The authenticated caller, derived exclusively from the verified session
/// token — never from request bodies
#[derive(Debug, Clone, Copy)]
pub struct Identity {
    /// Verified user ID
    pub user_id: Uuid,
}

#[axum::async_trait]
impl FromRequestParts<AppState> for Identity {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);

        let token = cookie::session_token(&jar).ok_or_else(|| {
            ApiError::Unauthenticated("Authentication failed: no token provided".to_string())
        })?;

        // Expired and malformed tokens get the same response.
        let claims = jwt::validate_token(&token, state.jwt_secret()).map_err(|_| {
            ApiError::Unauthenticated("Authentication failed: invalid token".to_string())
        })?;

        Ok(Identity {
            user_id: claims.sub,
        })
    }
}
