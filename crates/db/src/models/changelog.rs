//! Changelog entry model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use luminar_core::types::{DbId, Timestamp};

/// A row from the `changelogs` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Changelog {
    pub id: DbId,
    pub project_id: DbId,
    pub title: String,
    pub summary: String,
    pub content: String,
    pub image: Option<String>,
    pub publish_date: Option<Timestamp>,
    pub published: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a changelog entry.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateChangelog {
    pub title: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub content: String,
    pub image: Option<String>,
    pub publish_date: Option<Timestamp>,
    #[serde(default)]
    pub published: bool,
}
