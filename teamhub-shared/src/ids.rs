/// Opaque code generation for invite codes and task codes
///
/// Both codes are short, URL-safe tokens derived from UUIDv4. They are
/// backed by unique columns, so a (very unlikely) collision surfaces as a
/// constraint violation rather than silent reuse.
use uuid::Uuid;

/// Length of a workspace invite code
const INVITE_CODE_LEN: usize = 8;

/// Length of the random suffix in a task code
const TASK_CODE_LEN: usize = 8;

/// Generates a workspace invite code, e.g. `"3f9c2b71"`
pub fn generate_invite_code() -> String {
    Uuid::new_v4().simple().to_string()[..INVITE_CODE_LEN].to_string()
}

/// Generates a task code, e.g. `"task-8d41a0c9"`
pub fn generate_task_code() -> String {
    format!(
        "task-{}",
        &Uuid::new_v4().simple().to_string()[..TASK_CODE_LEN]
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invite_code_shape() {
        let code = generate_invite_code();
        assert_eq!(code.len(), INVITE_CODE_LEN);
        assert!(code.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_task_code_shape() {
        let code = generate_task_code();
        assert!(code.starts_with("task-"));
        assert_eq!(code.len(), "task-".len() + TASK_CODE_LEN);
    }

    #[test]
    fn test_codes_are_not_constant() {
        assert_ne!(generate_invite_code(), generate_invite_code());
        assert_ne!(generate_task_code(), generate_task_code());
    }
}
