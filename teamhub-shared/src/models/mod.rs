/// Database models for Teamhub
///
/// All model operations take `impl PgExecutor<'_>` so the same query runs
/// against the pool directly or inside a transaction (the transactional
/// workflows in [`crate::services`] rely on this).
///
/// # Models
///
/// - `user`: User accounts
/// - `account`: Identity-provider link (email/password, Google)
/// - `workspace`: Tenant boundary with invite code
/// - `role`: Seeded role records with permission sets
/// - `member`: User × workspace × role join
/// - `project`: Projects within a workspace
/// - `task`: Tasks within a project/workspace
pub mod account;
pub mod member;
pub mod project;
pub mod role;
pub mod task;
pub mod user;
pub mod workspace;
