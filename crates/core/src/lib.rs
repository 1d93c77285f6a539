//! Luminar domain core.
//!
//! Record shapes shared by the API server and the settings synchronizer,
//! the typed partial-update structures that travel between them, and the
//! validation rules both sides agree on.

pub mod diff;
pub mod error;
pub mod patch;
pub mod project;
pub mod project_config;
pub mod types;
pub mod upload;
