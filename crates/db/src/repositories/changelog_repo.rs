//! Repository for the `changelogs` table.

use luminar_core::types::DbId;
use sqlx::PgPool;

use crate::models::changelog::{Changelog, CreateChangelog};

const COLUMNS: &str = "id, project_id, title, summary, content, image, publish_date, \
     published, created_at, updated_at";

pub struct ChangelogRepo;

impl ChangelogRepo {
    pub async fn create(
        pool: &PgPool,
        project_id: DbId,
        input: &CreateChangelog,
    ) -> Result<Changelog, sqlx::Error> {
        let query = format!(
            "INSERT INTO changelogs (project_id, title, summary, content, image, publish_date, published)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Changelog>(&query)
            .bind(project_id)
            .bind(&input.title)
            .bind(&input.summary)
            .bind(&input.content)
            .bind(&input.image)
            .bind(input.publish_date)
            .bind(input.published)
            .fetch_one(pool)
            .await
    }

    /// Published changelogs for a project, newest publish date first.
    pub async fn list_published(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<Changelog>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM changelogs
             WHERE project_id = $1 AND published = TRUE
             ORDER BY publish_date DESC NULLS LAST, id DESC"
        );
        sqlx::query_as::<_, Changelog>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }
}
