/// User search endpoint
///
/// # Endpoint
///
/// ```text
/// GET /api/users/search?email=<fragment>
/// ```
///
/// Used by clients to find invitees. Authenticated but not project-scoped,
/// so it sits outside the projects gate; the `Identity` extractor still
/// requires a valid token.
use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use taskdeck_shared::models::user::{User, UserRef};

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::Identity,
};

/// Maximum number of search results returned
const SEARCH_LIMIT: i64 = 5;

/// Search query parameters
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    /// Email fragment to match
    pub email: Option<String>,
}

/// Search users by email fragment
///
/// Returns at most five `{id, email}` records whose email contains the
/// fragment; the caller is never included in the results.
///
/// # Errors
///
/// - `400 Bad Request`: missing or empty `email` parameter
/// - `401 Unauthorized`: no valid token
pub async fn search_users(
    State(state): State<AppState>,
    identity: Identity,
    Query(query): Query<SearchQuery>,
) -> ApiResult<Json<Vec<UserRef>>> {
    let fragment = query
        .email
        .filter(|email| !email.is_empty())
        .ok_or_else(|| ApiError::InvalidInput("Email query parameter is required".to_string()))?;

    let users =
        User::search_by_email(&state.db, &fragment, identity.user_id, SEARCH_LIMIT).await?;

    Ok(Json(users))
}
