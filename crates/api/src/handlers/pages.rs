//! Server-rendered sign-in flow.

use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Redirect, Response};
use axum::Form;
use luminar_core::error::CoreError;

use crate::auth::session::{clear_session_cookie, session_cookie};
use crate::error::{AppError, AppResult};
use crate::handlers::auth::{issue_token, verify_credentials, LoginRequest};
use crate::state::AppState;
use crate::views::sign_in::{self, SignInForm};
use crate::views::render;

/// Where authenticated users land.
pub const DASHBOARD_PATH: &str = "/dashboard";
pub const SIGN_IN_PATH: &str = "/login";

/// GET /login
///
/// Signed-in callers are redirected to the dashboard without rendering.
pub async fn sign_in_page(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Some(user) = state.sessions.current_user(&headers).await {
        tracing::debug!(user_id = user.user_id, "Session present, skipping sign-in");
        return Redirect::to(DASHBOARD_PATH).into_response();
    }

    render(sign_in::page(SignInForm::default())).into_response()
}

/// POST /login
pub async fn sign_in_submit(
    State(state): State<AppState>,
    Form(input): Form<LoginRequest>,
) -> AppResult<Response> {
    let user = match verify_credentials(&state.pool, &input.email, &input.password).await {
        Ok(user) => user,
        Err(AppError::Core(CoreError::Unauthorized(message))) => {
            let page = sign_in::page(SignInForm {
                email: Some(&input.email),
                error: Some(&message),
            });
            return Ok((StatusCode::UNAUTHORIZED, render(page)).into_response());
        }
        Err(e) => return Err(e),
    };

    let token = issue_token(&state, &user)?;
    let cookie = session_cookie(
        token,
        state.config.jwt.expiry_secs(),
        state.config.session_cookie_secure,
    );

    tracing::info!(user_id = user.id, "User signed in");

    Ok((
        [(SET_COOKIE, cookie.to_string())],
        Redirect::to(DASHBOARD_PATH),
    )
        .into_response())
}

/// POST /logout
pub async fn sign_out(State(state): State<AppState>) -> impl IntoResponse {
    let cookie = clear_session_cookie(state.config.session_cookie_secure);
    ([(SET_COOKIE, cookie.to_string())], Redirect::to(SIGN_IN_PATH))
}
