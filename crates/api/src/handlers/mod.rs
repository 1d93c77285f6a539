pub mod auth;
pub mod changelog;
pub mod pages;
pub mod project;
pub mod project_config;
