/// Authentication and authorization primitives
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`jwt`]: JWT token generation and validation for the API gate
/// - [`permissions`]: The static role → permission table and the guard
///
/// # Example
///
/// ```
/// use teamhub_shared::auth::password::{hash_password, verify_password};
/// use teamhub_shared::auth::permissions::{Permission, RoleName, RolePermissions};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("user_password")?;
/// assert!(verify_password("user_password", &hash)?);
///
/// let table = RolePermissions::new();
/// table.guard(RoleName::Owner, &[Permission::DeleteWorkspace])?;
/// # Ok(())
/// # }
/// ```
pub mod jwt;
pub mod password;
pub mod permissions;
