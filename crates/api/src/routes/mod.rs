pub mod auth;
pub mod changelog;
pub mod health;
pub mod pages;
pub mod project;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                         login (public)
///
/// /{slug}/changelogs                  published changelogs (public)
///
/// /projects/{slug}                    get, patch (owner only)
/// /projects/{slug}/config             get, patch (owner only)
/// /projects/{slug}/changelogs         published changelogs (public)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Session tokens.
        .nest("/auth", auth::router())
        // Public changelog feed.
        .merge(changelog::router())
        // Project settings.
        .nest("/projects", project::router())
}
