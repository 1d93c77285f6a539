//! Request extractors.
//!
//! - [`auth::AuthUser`] -- Requires a valid session, rejecting with 401.

pub mod auth;
