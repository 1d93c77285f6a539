//! Public changelog lookup.

use axum::extract::{Path, State};
use axum::Json;
use luminar_core::error::CoreError;
use luminar_db::models::changelog::Changelog;
use luminar_db::repositories::{ChangelogRepo, ProjectRepo};

use crate::error::AppResult;
use crate::state::AppState;

/// GET /api/v1/{slug}/changelogs
///
/// Published changelogs for the project, newest first. No authentication.
pub async fn list_public_changelogs(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Json<Vec<Changelog>>> {
    let project = ProjectRepo::find_by_slug(&state.pool, &slug)
        .await?
        .ok_or_else(|| CoreError::project_not_found(&slug))?;

    let changelogs = ChangelogRepo::list_published(&state.pool, project.id).await?;
    tracing::debug!(slug = %slug, count = changelogs.len(), "Served public changelogs");

    Ok(Json(changelogs))
}
