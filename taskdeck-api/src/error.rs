/// Error handling for the API server
///
/// All handlers return `Result<T, ApiError>`; the error converts to an
/// HTTP response with a `{error, message}` JSON body. The variants mirror
/// the domain error taxonomy: InvalidInput (400), Unauthenticated (401),
/// Forbidden (403), NotFound (404), Conflict (409), Internal (500).
///
/// Internal errors are logged server-side with full detail; clients only
/// ever see a generic message. No error propagates to the client as a raw
/// fault.
///
/// # Example
///
/// ```ignore
/// use taskdeck_api::error::{ApiError, ApiResult};
/// use axum::Json;
///
/// async fn handler() -> ApiResult<Json<serde_json::Value>> {
///     Err(ApiError::NotFound("Project not found".to_string()))
/// }
/// ```
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Missing or malformed input (400)
    InvalidInput(String),

    /// Field-level validation failures (400)
    Validation(Vec<ValidationErrorDetail>),

    /// Missing or invalid bearer token (401)
    Unauthenticated(String),

    /// Valid identity, insufficient privilege (403)
    Forbidden(String),

    /// Referenced entity absent (404)
    NotFound(String),

    /// Uniqueness violation, e.g. duplicate email or membership (409)
    Conflict(String),

    /// Unexpected failure (500)
    Internal(String),
}

/// Validation error detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationErrorDetail {
    /// Field that failed validation
    pub field: String,

    /// Error message
    pub message: String,
}

/// Error response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code (e.g., "invalid_input", "forbidden")
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// Optional field-level details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<ValidationErrorDetail>>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            ApiError::Validation(errors) => {
                write!(f, "Validation failed: {} errors", errors.len())
            }
            ApiError::Unauthenticated(msg) => write!(f, "Unauthenticated: {}", msg),
            ApiError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ApiError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message, details) = match self {
            ApiError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, "invalid_input", msg, None),
            ApiError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                "invalid_input",
                "Request validation failed".to_string(),
                Some(errors),
            ),
            ApiError::Unauthenticated(msg) => {
                (StatusCode::UNAUTHORIZED, "unauthenticated", msg, None)
            }
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, "forbidden", msg, None),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg, None),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg, None),
            ApiError::Internal(msg) => {
                // Full detail stays server-side.
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
        };

        let body = Json(ErrorResponse {
            error: error_code.to_string(),
            message,
            details,
        });

        (status, body).into_response()
    }
}

/// Convert sqlx errors to API errors
///
/// Unique violations become Conflict (with a message keyed on the violated
/// constraint), foreign key violations become NotFound (the referenced
/// entity is absent), and everything else is Internal.
impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ApiError::NotFound("Resource not found".to_string()),
            sqlx::Error::Database(db_err) => match db_err.kind() {
                sqlx::error::ErrorKind::UniqueViolation => {
                    let constraint = db_err.constraint().unwrap_or_default();
                    if constraint.contains("email") {
                        ApiError::Conflict("A user with this email already exists".to_string())
                    } else if constraint.contains("memberships") {
                        ApiError::Conflict(
                            "User is already a member of this project".to_string(),
                        )
                    } else {
                        ApiError::Conflict("Resource already exists".to_string())
                    }
                }
                sqlx::error::ErrorKind::ForeignKeyViolation => {
                    ApiError::NotFound("Referenced resource not found".to_string())
                }
                _ => ApiError::Internal(format!("Database error: {}", db_err)),
            },
            _ => ApiError::Internal(format!("Database error: {}", err)),
        }
    }
}

/// Convert authorization errors to API errors
impl From<taskdeck_shared::auth::authorization::AuthzError> for ApiError {
    fn from(err: taskdeck_shared::auth::authorization::AuthzError) -> Self {
        use taskdeck_shared::auth::authorization::AuthzError;

        match err {
            AuthzError::NotMember => {
                ApiError::Forbidden("You are not a member of this project".to_string())
            }
            AuthzError::NotOwner => ApiError::Forbidden(
                "Only the project owner can perform this action".to_string(),
            ),
            AuthzError::ProjectNotFound => ApiError::NotFound("Project not found".to_string()),
            AuthzError::TaskNotFound => ApiError::NotFound("Task not found".to_string()),
            AuthzError::Database(err) => ApiError::from(err),
        }
    }
}

/// Convert token errors to API errors
///
/// Expired and malformed tokens are not distinguished to the caller.
impl From<taskdeck_shared::auth::jwt::TokenError> for ApiError {
    fn from(_: taskdeck_shared::auth::jwt::TokenError) -> Self {
        ApiError::Unauthenticated("Authentication failed".to_string())
    }
}

/// Convert password errors to API errors
impl From<taskdeck_shared::auth::password::PasswordError> for ApiError {
    fn from(err: taskdeck_shared::auth::password::PasswordError) -> Self {
        ApiError::Internal(format!("Password operation failed: {}", err))
    }
}

/// Convert middleware auth errors to API errors
impl From<taskdeck_shared::auth::middleware::AuthError> for ApiError {
    fn from(err: taskdeck_shared::auth::middleware::AuthError) -> Self {
        use taskdeck_shared::auth::middleware::AuthError;

        match err {
            AuthError::MissingToken => ApiError::Unauthenticated(
                "Authentication failed: no token provided".to_string(),
            ),
            AuthError::InvalidToken => {
                ApiError::Unauthenticated("Authentication failed: invalid token".to_string())
            }
        }
    }
}

/// Convert validator failures to field-level API errors
impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let details: Vec<ValidationErrorDetail> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| ValidationErrorDetail {
                    field: field.to_string(),
                    message: error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| "Validation failed".to_string()),
                })
            })
            .collect();

        ApiError::Validation(details)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ApiError::InvalidInput("Project name is required".to_string());
        assert_eq!(err.to_string(), "Invalid input: Project name is required");

        let err = ApiError::NotFound("Task not found".to_string());
        assert_eq!(err.to_string(), "Not found: Task not found");
    }

    #[test]
    fn test_status_codes() {
        let cases = [
            (
                ApiError::InvalidInput("x".to_string()),
                StatusCode::BAD_REQUEST,
            ),
            (
                ApiError::Validation(vec![]),
                StatusCode::BAD_REQUEST,
            ),
            (
                ApiError::Unauthenticated("x".to_string()),
                StatusCode::UNAUTHORIZED,
            ),
            (ApiError::Forbidden("x".to_string()), StatusCode::FORBIDDEN),
            (ApiError::NotFound("x".to_string()), StatusCode::NOT_FOUND),
            (ApiError::Conflict("x".to_string()), StatusCode::CONFLICT),
            (
                ApiError::Internal("x".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }

    #[test]
    fn test_authz_error_mapping() {
        use taskdeck_shared::auth::authorization::AuthzError;

        assert!(matches!(
            ApiError::from(AuthzError::NotMember),
            ApiError::Forbidden(_)
        ));
        assert!(matches!(
            ApiError::from(AuthzError::NotOwner),
            ApiError::Forbidden(_)
        ));
        assert!(matches!(
            ApiError::from(AuthzError::ProjectNotFound),
            ApiError::NotFound(_)
        ));
        assert!(matches!(
            ApiError::from(AuthzError::TaskNotFound),
            ApiError::NotFound(_)
        ));
    }

    #[test]
    fn test_token_error_collapses_to_unauthenticated() {
        use taskdeck_shared::auth::jwt::TokenError;

        let expired = ApiError::from(TokenError::Expired);
        let malformed = ApiError::from(TokenError::Invalid("garbled".to_string()));

        // Expired and malformed produce identical client-facing errors.
        assert_eq!(expired.to_string(), malformed.to_string());
    }

    #[test]
    fn test_row_not_found_maps_to_not_found() {
        let err = ApiError::from(sqlx::Error::RowNotFound);
        assert!(matches!(err, ApiError::NotFound(_)));
    }
}
