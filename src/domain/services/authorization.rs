use crate::domain::models::user::{User, ROLE_ADMIN, ROLE_MANAGER, ROLE_MEMBER};
use crate::error::AppError;

/// What an actor is asking to do. Every privileged handler calls
/// `authorize` with one of these instead of comparing role strings inline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    ManageOrganization,
    ManageMembers,
    ManageFleet,
    ManageBookings,
    RecordTransfers,
}

fn role_allows(role: &str, cap: Capability) -> bool {
    match role {
        ROLE_ADMIN => true,
        ROLE_MANAGER => matches!(
            cap,
            Capability::ManageFleet | Capability::ManageBookings | Capability::RecordTransfers
        ),
        ROLE_MEMBER => matches!(cap, Capability::ManageBookings),
        _ => false,
    }
}

pub fn authorize(user: &User, cap: Capability) -> Result<(), AppError> {
    if role_allows(&user.role, cap) {
        Ok(())
    } else {
        Err(AppError::Forbidden(format!(
            "Role {} may not perform this action",
            user.role
        )))
    }
}

/// Tenancy guard: the org in the token must match the org in the path.
pub fn ensure_org_member(user: &User, org_id: &str) -> Result<(), AppError> {
    if user.org_id != org_id {
        return Err(AppError::Forbidden(
            "Not a member of this organization".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: &str) -> User {
        User::new("org".into(), "u".into(), "hash".into(), role)
    }

    #[test]
    fn test_admin_has_all_capabilities() {
        let admin = user(ROLE_ADMIN);
        for cap in [
            Capability::ManageOrganization,
            Capability::ManageMembers,
            Capability::ManageFleet,
            Capability::ManageBookings,
            Capability::RecordTransfers,
        ] {
            assert!(authorize(&admin, cap).is_ok());
        }
    }

    #[test]
    fn test_manager_cannot_administer_org() {
        let manager = user(ROLE_MANAGER);
        assert!(authorize(&manager, Capability::ManageFleet).is_ok());
        assert!(authorize(&manager, Capability::ManageMembers).is_err());
        assert!(authorize(&manager, Capability::ManageOrganization).is_err());
    }

    #[test]
    fn test_org_mismatch_rejected() {
        let u = user(ROLE_ADMIN);
        assert!(ensure_org_member(&u, "org").is_ok());
        assert!(ensure_org_member(&u, "other-org").is_err());
    }

    #[test]
    fn test_member_limited_to_bookings() {
        let member = user(ROLE_MEMBER);
        assert!(authorize(&member, Capability::ManageBookings).is_ok());
        assert!(authorize(&member, Capability::ManageFleet).is_err());
        assert!(authorize(&member, Capability::RecordTransfers).is_err());
    }
}
