//! Repository for the `project_configs` table.

use luminar_core::project_config::ProjectConfigPatch;
use luminar_core::types::DbId;
use sqlx::PgPool;

use crate::models::project_config::ProjectConfig;

/// Everything except `integration_sso_secret`.
const COLUMNS: &str = "project_id, changelog_twitter_handle, changelog_preview_style, \
     feedback_allow_anon_upvoting, created_at, updated_at";

pub struct ProjectConfigRepo;

impl ProjectConfigRepo {
    pub async fn find_by_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Option<ProjectConfig>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM project_configs WHERE project_id = $1");
        sqlx::query_as::<_, ProjectConfig>(&query)
            .bind(project_id)
            .fetch_optional(pool)
            .await
    }

    /// Apply a partial update to a project's configuration.
    ///
    /// Returns `None` if the project has no configuration row.
    pub async fn update(
        pool: &PgPool,
        project_id: DbId,
        patch: &ProjectConfigPatch,
    ) -> Result<Option<ProjectConfig>, sqlx::Error> {
        let query = format!(
            "UPDATE project_configs SET
                changelog_twitter_handle = CASE WHEN $2 THEN $3 ELSE changelog_twitter_handle END,
                changelog_preview_style = COALESCE($4, changelog_preview_style),
                feedback_allow_anon_upvoting = COALESCE($5, feedback_allow_anon_upvoting),
                updated_at = NOW()
             WHERE project_id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProjectConfig>(&query)
            .bind(project_id)
            .bind(patch.changelog_twitter_handle.is_present())
            .bind(patch.changelog_twitter_handle.value())
            .bind(patch.changelog_preview_style.map(|s| s.as_str()))
            .bind(patch.feedback_allow_anon_upvoting)
            .fetch_optional(pool)
            .await
    }
}
