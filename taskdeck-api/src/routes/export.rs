/// Project export endpoint
///
/// # Endpoint
///
/// ```text
/// GET /api/projects/:project_id/export
/// ```
///
/// Produces a downloadable JSON snapshot of the project's full graph —
/// the project record, every task with its assignee resolved, and every
/// membership with its member resolved — materialized in one read
/// transaction. The artifact is generated on demand and never persisted.
use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, HeaderValue},
    response::IntoResponse,
};
use chrono::{SecondsFormat, Utc};
use uuid::Uuid;

use taskdeck_shared::{auth::authorization::require_member, models::project::Project};

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::Identity,
};

/// Builds the attachment filename from the project name and a timestamp
///
/// Whitespace runs in the name collapse to single underscores.
fn export_filename(project_name: &str, timestamp: &str) -> String {
    let name = project_name.split_whitespace().collect::<Vec<_>>().join("_");
    format!("project_{}_{}.json", name, timestamp)
}

/// Export a project
///
/// Membership is sufficient — ownership is not required to export.
///
/// # Errors
///
/// - `403 Forbidden`: caller is not a member
/// - `404 Not Found`: project vanished between the membership check and
///   the snapshot read
pub async fn export_project(
    State(state): State<AppState>,
    identity: Identity,
    Path(project_id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    require_member(&state.db, project_id, identity.user_id).await?;

    let snapshot = Project::export_snapshot(&state.db, project_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;

    let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
    let filename = export_filename(&snapshot.name, &timestamp);

    let body = serde_json::to_string_pretty(&snapshot)
        .map_err(|e| ApiError::Internal(format!("Snapshot serialization failed: {}", e)))?;

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_str(&format!("attachment; filename=\"{}\"", filename))
            .map_err(|e| ApiError::Internal(format!("Invalid export filename: {}", e)))?,
    );

    tracing::info!(project_id = %project_id, "Project exported");

    Ok((headers, body))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_filename_replaces_whitespace() {
        let filename = export_filename("Sprint  Alpha Board", "2026-01-01T00:00:00.000Z");
        assert_eq!(
            filename,
            "project_Sprint_Alpha_Board_2026-01-01T00:00:00.000Z.json"
        );
    }

    #[test]
    fn test_export_filename_plain_name() {
        let filename = export_filename("Sprint", "2026-01-01T00:00:00.000Z");
        assert!(filename.starts_with("project_Sprint_"));
        assert!(filename.ends_with(".json"));
    }
}
