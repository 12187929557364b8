/// Business workflows for Teamhub
///
/// Route handlers stay thin: they authenticate, authorize via the
/// permission guard, and call into these services. Multi-document
/// workflows (signup, workspace creation and teardown, project deletion,
/// invite join) run inside a single transaction and roll back every
/// partial write on failure.
///
/// # Modules
///
/// - `auth`: registration, provider login, password verification
/// - `workspace`: provisioning, teardown, membership roles, analytics
/// - `member`: invite-code join
/// - `project`: project CRUD, listing, analytics
/// - `task`: task CRUD, filtered listing
/// - `roles`: one-time role table seeding
pub mod auth;
pub mod member;
pub mod project;
pub mod roles;
pub mod task;
pub mod workspace;
