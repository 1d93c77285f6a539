//! Row models and DTOs.
//!
//! Each submodule contains a `FromRow` + `Serialize` entity struct matching
//! the database row, plus the `Deserialize` DTOs used to write it.

pub mod changelog;
pub mod project;
pub mod project_config;
pub mod user;
