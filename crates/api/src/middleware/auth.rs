//! Session-based authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use luminar_core::error::CoreError;
use luminar_core::types::DbId;

use crate::error::AppError;
use crate::state::AppState;

/// Authenticated user resolved through the configured session provider.
///
/// Accepts the session cookie or a Bearer token:
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = user.user_id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: DbId,
    pub email: String,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = state
            .sessions
            .current_user(&parts.headers)
            .await
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing or invalid session".into(),
                ))
            })?;

        Ok(AuthUser {
            user_id: user.user_id,
            email: user.email,
        })
    }
}
