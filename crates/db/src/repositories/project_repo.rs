//! Repository for the `projects` table.

use luminar_core::project::ProjectPatch;
use luminar_core::types::DbId;
use sqlx::PgPool;

use crate::models::project::{CreateProject, Project};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, slug, name, owner_id, icon, icon_radius, og_image, created_at, updated_at";

/// Provides lookups and partial updates for projects.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a project together with its default configuration row.
    pub async fn create(
        pool: &PgPool,
        owner_id: DbId,
        input: &CreateProject,
    ) -> Result<Project, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO projects (slug, name, owner_id)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        let project = sqlx::query_as::<_, Project>(&query)
            .bind(&input.slug)
            .bind(&input.name)
            .bind(owner_id)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query("INSERT INTO project_configs (project_id) VALUES ($1)")
            .bind(project.id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(project)
    }

    /// Find a project by its public slug.
    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE slug = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// Find a project by slug, only if `owner_id` owns it.
    pub async fn find_owned(
        pool: &PgPool,
        slug: &str,
        owner_id: DbId,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE slug = $1 AND owner_id = $2");
        sqlx::query_as::<_, Project>(&query)
            .bind(slug)
            .bind(owner_id)
            .fetch_optional(pool)
            .await
    }

    /// Apply a partial update. Each field is written only when the patch
    /// names it; `Patch::Clear` stores NULL.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        patch: &ProjectPatch,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET
                icon = CASE WHEN $2 THEN $3 ELSE icon END,
                icon_radius = COALESCE($4, icon_radius),
                og_image = CASE WHEN $5 THEN $6 ELSE og_image END,
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(patch.icon.is_present())
            .bind(patch.icon.value())
            .bind(patch.icon_radius.map(|r| r.as_str()))
            .bind(patch.og_image.is_present())
            .bind(patch.og_image.value())
            .fetch_optional(pool)
            .await
    }
}
