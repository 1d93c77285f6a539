//! Owner-scoped project configuration endpoints.
//!
//! Responses never include the integration secret.

use axum::extract::{Path, State};
use axum::Json;
use luminar_core::error::CoreError;
use luminar_core::project_config::ProjectConfigPatch;
use luminar_db::models::project_config::ProjectConfig;
use luminar_db::repositories::ProjectConfigRepo;

use crate::error::AppResult;
use crate::handlers::project::ensure_owned_project;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

fn config_not_found(slug: &str) -> CoreError {
    CoreError::NotFound {
        entity: "ProjectConfig",
        key: slug.to_string(),
    }
}

/// GET /api/v1/projects/{slug}/config
pub async fn get_project_config(
    user: AuthUser,
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Json<ProjectConfig>> {
    let project = ensure_owned_project(&state.pool, &slug, user.user_id).await?;

    let config = ProjectConfigRepo::find_by_project(&state.pool, project.id)
        .await?
        .ok_or_else(|| config_not_found(&slug))?;

    Ok(Json(config))
}

/// PATCH /api/v1/projects/{slug}/config
pub async fn update_project_config(
    user: AuthUser,
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(patch): Json<ProjectConfigPatch>,
) -> AppResult<Json<ProjectConfig>> {
    let project = ensure_owned_project(&state.pool, &slug, user.user_id).await?;

    let patch = patch.normalized()?;
    let config = if patch.is_empty() {
        ProjectConfigRepo::find_by_project(&state.pool, project.id).await?
    } else {
        ProjectConfigRepo::update(&state.pool, project.id, &patch).await?
    }
    .ok_or_else(|| config_not_found(&slug))?;

    if !patch.is_empty() {
        tracing::info!(slug = %slug, user_id = user.user_id, "Project config updated");
    }

    Ok(Json(config))
}
