//! # Teamhub Shared Library
//!
//! This crate contains the database models, authentication primitives, and
//! business workflows shared by the Teamhub API server.
//!
//! ## Module Organization
//!
//! - `models`: Database models and data structures
//! - `auth`: Password hashing, JWT tokens, and the permission table
//! - `services`: Transactional workflows (signup, workspace teardown, ...)
//! - `db`: Connection pool and migration runner
//! - `pagination`: Offset pagination helpers
//! - `error`: Service-level error taxonomy

pub mod auth;
pub mod db;
pub mod error;
pub mod ids;
pub mod models;
pub mod pagination;
pub mod services;

/// Current version of the Teamhub shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
