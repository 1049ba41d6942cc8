//! Roles of signed-in callers.
//!
//! A role arrives in the `role` claim of the access token. When the user has
//! a profile, the role stored there takes precedence, so staff changes made
//! through the user admin endpoints apply without reissuing tokens.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::CoreError;

pub const ROLE_SUPER_ADMIN: &str = "super_admin";
pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_CUSTOMER: &str = "customer";

/// What a signed-in caller may do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Admin who may also grant and revoke admin rights of other admins.
    SuperAdmin,
    /// Staff with access to the menu and user administration endpoints.
    Admin,
    /// A signed-in shopper.
    Customer,
}

impl Role {
    /// Map a claim value to a role. Anything unrecognised gets the least
    /// privileged role.
    pub fn from_claim(value: &str) -> Self {
        value.parse().unwrap_or(Role::Customer)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::SuperAdmin => ROLE_SUPER_ADMIN,
            Role::Admin => ROLE_ADMIN,
            Role::Customer => ROLE_CUSTOMER,
        }
    }

    pub fn is_admin(self) -> bool {
        matches!(self, Role::Admin | Role::SuperAdmin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            ROLE_SUPER_ADMIN => Ok(Role::SuperAdmin),
            ROLE_ADMIN => Ok(Role::Admin),
            ROLE_CUSTOMER => Ok(Role::Customer),
            other => Err(CoreError::Validation(format!(
                "unknown role '{other}', expected one of: {ROLE_CUSTOMER}, {ROLE_ADMIN}, {ROLE_SUPER_ADMIN}"
            ))),
        }
    }
}

/// Check that `actor` may move a user from `current` to `new`.
///
/// Any admin may promote customers or demote admins. Granting or revoking
/// `super_admin` takes a super admin.
pub fn check_role_change(actor: Role, current: Role, new: Role) -> Result<(), CoreError> {
    if !actor.is_admin() {
        return Err(CoreError::Forbidden(
            "changing roles requires the admin role".to_string(),
        ));
    }
    let touches_super = current == Role::SuperAdmin || new == Role::SuperAdmin;
    if touches_super && actor != Role::SuperAdmin {
        return Err(CoreError::Forbidden(
            "only a super admin can grant or revoke super_admin".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn admin_claims_map_to_admin_roles() {
        assert_eq!(Role::from_claim("admin"), Role::Admin);
        assert_eq!(Role::from_claim("ADMIN"), Role::Admin);
        assert_eq!(Role::from_claim("super_admin"), Role::SuperAdmin);
        assert!(Role::SuperAdmin.is_admin());
    }

    #[test]
    fn unknown_claims_fall_back_to_customer() {
        for claim in ["customer", "", "superuser", "staff"] {
            assert_eq!(Role::from_claim(claim), Role::Customer, "claim {claim:?}");
        }
    }

    #[test]
    fn strict_parse_rejects_unknown_role() {
        assert_matches!("owner".parse::<Role>(), Err(CoreError::Validation(_)));
        assert_eq!("customer".parse::<Role>().unwrap(), Role::Customer);
    }

    #[test]
    fn admin_can_promote_and_demote_below_super() {
        assert!(check_role_change(Role::Admin, Role::Customer, Role::Admin).is_ok());
        assert!(check_role_change(Role::Admin, Role::Admin, Role::Customer).is_ok());
    }

    #[test]
    fn super_admin_changes_need_a_super_admin() {
        assert_matches!(
            check_role_change(Role::Admin, Role::Customer, Role::SuperAdmin),
            Err(CoreError::Forbidden(_))
        );
        assert_matches!(
            check_role_change(Role::Admin, Role::SuperAdmin, Role::Admin),
            Err(CoreError::Forbidden(_))
        );
        assert!(check_role_change(Role::SuperAdmin, Role::Customer, Role::SuperAdmin).is_ok());
    }

    #[test]
    fn customers_cannot_change_roles() {
        assert_matches!(
            check_role_change(Role::Customer, Role::Customer, Role::Admin),
            Err(CoreError::Forbidden(_))
        );
    }
}
