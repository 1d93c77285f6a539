//! Route definitions for the `/projects` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::{project, project_config};
use crate::state::AppState;

/// Routes mounted at `/projects`.
///
/// ```text
/// GET    /{slug}          -> get_project
/// PATCH  /{slug}          -> update_project
/// GET    /{slug}/config   -> get_project_config
/// PATCH  /{slug}/config   -> update_project_config
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/{slug}",
            get(project::get_project).patch(project::update_project),
        )
        .route(
            "/{slug}/config",
            get(project_config::get_project_config).patch(project_config::update_project_config),
        )
}
