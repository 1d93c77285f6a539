use axum::routing::{get, post};
use axum::Router;

use crate::handlers::pages;
use crate::state::AppState;

/// Server-rendered pages, mounted at the root.
///
/// ```text
/// GET  /login   -> sign_in_page
/// POST /login   -> sign_in_submit
/// POST /logout  -> sign_out
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            pages::SIGN_IN_PATH,
            get(pages::sign_in_page).post(pages::sign_in_submit),
        )
        .route("/logout", post(pages::sign_out))
}
