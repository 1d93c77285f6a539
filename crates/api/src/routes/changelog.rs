use axum::routing::get;
use axum::Router;

use crate::handlers::changelog;
use crate::state::AppState;

/// Public changelog routes, merged at the `/api/v1` root.
///
/// ```text
/// GET /{slug}/changelogs           -> list_public_changelogs
/// GET /projects/{slug}/changelogs  -> list_public_changelogs
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{slug}/changelogs", get(changelog::list_public_changelogs))
        .route(
            "/projects/{slug}/changelogs",
            get(changelog::list_public_changelogs),
        )
}
