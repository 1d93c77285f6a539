//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument.

pub mod changelog_repo;
pub mod project_config_repo;
pub mod project_repo;
pub mod user_repo;

pub use changelog_repo::ChangelogRepo;
pub use project_config_repo::ProjectConfigRepo;
pub use project_repo::ProjectRepo;
pub use user_repo::UserRepo;
