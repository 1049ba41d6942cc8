//! Authentication primitives.
//!
//! - [`jwt`] -- JWT access-token generation and validation.
//!
//! Accounts, passwords and refresh tokens live in the external identity
//! provider; this service only verifies the tokens it issues.

pub mod jwt;
