//! Authentication primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`jwt`] -- HS256 session token generation and validation.
//! - [`session`] -- Resolving the caller's session from request headers.

pub mod jwt;
pub mod password;
pub mod session;
