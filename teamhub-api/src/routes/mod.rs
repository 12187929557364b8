/// API route handlers
///
/// Handlers are thin: deserialize and validate the request, authorize the
/// caller against the target workspace, call a service function, wrap the
/// result in the success envelope.
pub mod auth;
pub mod health;
pub mod member;
pub mod project;
pub mod task;
pub mod user;
pub mod workspace;
