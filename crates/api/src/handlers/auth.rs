//! Password login.

use axum::extract::State;
use axum::Json;
use luminar_core::error::CoreError;
use luminar_core::types::DbId;
use luminar_db::models::user::User;
use luminar_db::repositories::UserRepo;
use luminar_db::DbPool;
use serde::{Deserialize, Serialize};

use crate::auth::jwt::generate_access_token;
use crate::auth::password::{verify_decoy, verify_password};
use crate::error::{AppError, AppResult};
use crate::state::AppState;

pub(crate) const INVALID_CREDENTIALS: &str = "Invalid email or password";

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /api/v1/auth/login` (also the sign-in form fields).
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    /// Token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserInfo,
}

#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub id: DbId,
    pub email: String,
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Check an email/password pair. Unknown email and wrong password produce the
/// same `Unauthorized` error.
pub(crate) async fn verify_credentials(
    pool: &DbPool,
    email: &str,
    password: &str,
) -> AppResult<User> {
    let invalid = || AppError::Core(CoreError::Unauthorized(INVALID_CREDENTIALS.into()));

    let Some(user) = UserRepo::find_by_email(pool, email.trim()).await? else {
        verify_decoy(password);
        return Err(invalid());
    };

    if !verify_password(password, &user.password_hash)? {
        tracing::info!(user_id = user.id, "Login rejected: wrong password");
        return Err(invalid());
    }

    Ok(user)
}

/// Issue a session token for an authenticated user.
pub(crate) fn issue_token(state: &AppState, user: &User) -> AppResult<String> {
    Ok(generate_access_token(user.id, &user.email, &state.config.jwt)?)
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let user = verify_credentials(&state.pool, &input.email, &input.password).await?;
    let access_token = issue_token(&state, &user)?;

    tracing::info!(user_id = user.id, "User logged in");

    Ok(Json(AuthResponse {
        access_token,
        expires_in: state.config.jwt.expiry_secs(),
        user: UserInfo {
            id: user.id,
            email: user.email,
        },
    }))
}
