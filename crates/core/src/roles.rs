//! Well-known role name constants.
//!
//! These must match the CHECK constraint in `20260301000002_create_users.sql`.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_EDITOR: &str = "editor";

/// All valid role names.
pub const VALID_ROLES: &[&str] = &[ROLE_ADMIN, ROLE_EDITOR];

/// Whether the role grants access to the content back-office.
pub fn is_staff(role: &str) -> bool {
    VALID_ROLES.contains(&role)
}
