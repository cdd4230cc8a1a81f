//! Authentication primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`jwt`] -- HS256 access-token generation and validation.
//! - [`cookie`] -- the HTTP-only `access_token` cookie.

pub mod cookie;
pub mod jwt;
pub mod password;
