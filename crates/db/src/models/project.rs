//! Project entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use luminar_core::types::{DbId, Timestamp};

/// A project row from the `projects` table.
///
/// `icon_radius` holds one of the `IconRadius` style tokens; the column's
/// CHECK constraint keeps it in that set.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: DbId,
    pub slug: String,
    pub name: String,
    pub owner_id: DbId,
    pub icon: Option<String>,
    pub icon_radius: String,
    pub og_image: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new project.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProject {
    pub slug: String,
    pub name: String,
}
