//! Owner-scoped project settings endpoints.

use axum::extract::{Path, State};
use axum::Json;
use luminar_core::error::CoreError;
use luminar_core::project::ProjectPatch;
use luminar_core::types::DbId;
use luminar_db::models::project::Project;
use luminar_db::repositories::ProjectRepo;
use luminar_db::DbPool;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Load a project the caller owns. Someone else's project is reported as
/// not found so slugs of other tenants are not disclosed.
pub(crate) async fn ensure_owned_project(
    pool: &DbPool,
    slug: &str,
    user_id: DbId,
) -> AppResult<Project> {
    ProjectRepo::find_owned(pool, slug, user_id)
        .await?
        .ok_or_else(|| CoreError::project_not_found(slug).into())
}

/// GET /api/v1/projects/{slug}
pub async fn get_project(
    user: AuthUser,
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Json<Project>> {
    let project = ensure_owned_project(&state.pool, &slug, user.user_id).await?;
    Ok(Json(project))
}

/// PATCH /api/v1/projects/{slug}
///
/// Only the fields present in the body are written. An empty body returns
/// the current record without touching the row.
pub async fn update_project(
    user: AuthUser,
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(patch): Json<ProjectPatch>,
) -> AppResult<Json<Project>> {
    let project = ensure_owned_project(&state.pool, &slug, user.user_id).await?;

    let patch = patch.normalized()?;
    if patch.is_empty() {
        return Ok(Json(project));
    }

    let updated = ProjectRepo::update(&state.pool, project.id, &patch)
        .await?
        .ok_or_else(|| CoreError::project_not_found(&slug))?;

    tracing::info!(
        slug = %slug,
        user_id = user.user_id,
        icon = patch.icon.is_present(),
        icon_radius = patch.icon_radius.is_some(),
        og_image = patch.og_image.is_present(),
        "Project updated",
    );

    Ok(Json(updated))
}
