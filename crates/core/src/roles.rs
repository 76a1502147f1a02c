//! Well-known role name constants.
//!
//! These must match the `role` CHECK constraint in
//! `0001_initial.sql`.

use crate::error::CoreError;

pub const ROLE_CUSTOMER: &str = "customer";
pub const ROLE_SUPPORT: &str = "support";
pub const ROLE_TECHNICAL_SUPPORT_ADMIN: &str = "technical_support_admin";
pub const ROLE_SYSTEM_ADMIN: &str = "system_admin";

/// All valid role values.
pub const VALID_ROLES: &[&str] = &[
    ROLE_CUSTOMER,
    ROLE_SUPPORT,
    ROLE_TECHNICAL_SUPPORT_ADMIN,
    ROLE_SYSTEM_ADMIN,
];

/// A role that may be assigned tickets and perform support-side actions.
pub fn is_support_capable(role: &str) -> bool {
    matches!(
        role,
        ROLE_SUPPORT | ROLE_TECHNICAL_SUPPORT_ADMIN | ROLE_SYSTEM_ADMIN
    )
}

/// A role allowed to manage assignment, templates, and monitoring views.
pub fn is_admin(role: &str) -> bool {
    matches!(role, ROLE_TECHNICAL_SUPPORT_ADMIN | ROLE_SYSTEM_ADMIN)
}

/// Validate that a role string is one of the accepted values.
pub fn validate_role(role: &str) -> Result<(), CoreError> {
    if VALID_ROLES.contains(&role) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid role '{role}'. Must be one of: {}",
            VALID_ROLES.join(", ")
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn support_capable_roles() {
        assert!(is_support_capable(ROLE_SUPPORT));
        assert!(is_support_capable(ROLE_TECHNICAL_SUPPORT_ADMIN));
        assert!(is_support_capable(ROLE_SYSTEM_ADMIN));
        assert!(!is_support_capable(ROLE_CUSTOMER));
    }

    #[test]
    fn admin_roles() {
        assert!(is_admin(ROLE_SYSTEM_ADMIN));
        assert!(is_admin(ROLE_TECHNICAL_SUPPORT_ADMIN));
        assert!(!is_admin(ROLE_SUPPORT));
        assert!(!is_admin(ROLE_CUSTOMER));
    }

    #[test]
    fn unknown_role_rejected() {
        assert!(validate_role("superuser").is_err());
        assert!(validate_role("").is_err());
    }
}
