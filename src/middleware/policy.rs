//! The single capability-check point for role and ownership decisions.
//! Handlers and services call these instead of re-deriving role logic.

use crate::error::AppError;
use crate::models::Role;
use crate::services::Claims;

/// Staff (admin, employee, technician) may act on any order or ticket.
pub fn require_staff(caller: &Claims) -> Result<(), AppError> {
    if caller.role.is_staff() {
        Ok(())
    } else {
        Err(AppError::Forbidden(anyhow::anyhow!(
            "Forbidden: staff access required"
        )))
    }
}

pub fn require_admin(caller: &Claims) -> Result<(), AppError> {
    if caller.role == Role::Admin {
        Ok(())
    } else {
        Err(AppError::Forbidden(anyhow::anyhow!(
            "Forbidden: admin access required"
        )))
    }
}

/// A resource scoped to `owner_id` is visible to its owner and to staff.
pub fn require_owner_or_staff(caller: &Claims, owner_id: &str) -> Result<(), AppError> {
    if caller.role.is_staff() || caller.sub == owner_id {
        Ok(())
    } else {
        Err(AppError::Forbidden(anyhow::anyhow!("Forbidden")))
    }
}

/// Account records are editable by their subject and by admins; other staff
/// get no special access.
pub fn require_self_or_admin(caller: &Claims, account_id: &str) -> Result<(), AppError> {
    if caller.role == Role::Admin || caller.sub == account_id {
        Ok(())
    } else {
        Err(AppError::Forbidden(anyhow::anyhow!("Forbidden")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(role: Role) -> Claims {
        Claims {
            sub: "acct_1".to_string(),
            email: "one@example.com".to_string(),
            role,
            exp: 0,
            iat: 0,
        }
    }

    #[test]
    fn staff_roles_pass_the_staff_check() {
        assert!(require_staff(&claims(Role::Admin)).is_ok());
        assert!(require_staff(&claims(Role::Employee)).is_ok());
        assert!(require_staff(&claims(Role::Technician)).is_ok());
        assert!(require_staff(&claims(Role::Customer)).is_err());
    }

    #[test]
    fn only_admin_passes_the_admin_check() {
        assert!(require_admin(&claims(Role::Admin)).is_ok());
        assert!(require_admin(&claims(Role::Employee)).is_err());
        assert!(require_admin(&claims(Role::Customer)).is_err());
    }

    #[test]
    fn owners_and_staff_reach_owned_resources() {
        assert!(require_owner_or_staff(&claims(Role::Customer), "acct_1").is_ok());
        assert!(require_owner_or_staff(&claims(Role::Customer), "acct_2").is_err());
        assert!(require_owner_or_staff(&claims(Role::Technician), "acct_2").is_ok());
    }

    #[test]
    fn account_edits_are_self_or_admin_only() {
        assert!(require_self_or_admin(&claims(Role::Customer), "acct_1").is_ok());
        assert!(require_self_or_admin(&claims(Role::Employee), "acct_2").is_err());
        assert!(require_self_or_admin(&claims(Role::Admin), "acct_2").is_ok());
    }
}
