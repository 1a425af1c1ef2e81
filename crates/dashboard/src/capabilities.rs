//! Capability checks for role-conditional rendering.
//!
//! One place decides which affordances a profile sees; every template and
//! handler goes through these instead of comparing role codes ad hoc. This is
//! display gating only - the API enforces authorization on every call.

use crate::wms::Profile;

/// Whether the Users tab (and users table) is shown.
#[must_use]
pub fn can_view_users(profile: &Profile) -> bool {
    profile.role.is_admin()
}

/// Whether the Active Users metric appears on the overview.
#[must_use]
pub fn can_view_active_users(profile: &Profile) -> bool {
    profile.role.is_admin()
}

#[cfg(test)]
mod tests {
    use super::*;

    use stockdeck_core::{Role, UserId};

    fn profile(role: Role) -> Profile {
        Profile {
            id: UserId::new(1),
            username: "lead".to_string(),
            role,
        }
    }

    #[test]
    fn test_admin_sees_users_tab_and_metric() {
        let admin = profile(Role::Admin);
        assert!(can_view_users(&admin));
        assert!(can_view_active_users(&admin));
    }

    #[test]
    fn test_staff_sees_neither() {
        let staff = profile(Role::Staff);
        assert!(!can_view_users(&staff));
        assert!(!can_view_active_users(&staff));
    }
}
