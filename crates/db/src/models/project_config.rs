//! Project configuration model.

use serde::Serialize;
use sqlx::FromRow;
use luminar_core::types::{DbId, Timestamp};

/// A `project_configs` row without its integration secret.
///
/// The secret column is never selected, so this type is safe to return from
/// any endpoint.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProjectConfig {
    pub project_id: DbId,
    pub changelog_twitter_handle: Option<String>,
    pub changelog_preview_style: String,
    pub feedback_allow_anon_upvoting: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
