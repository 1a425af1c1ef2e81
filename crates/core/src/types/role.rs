//! User role codes.
//!
//! The warehouse API represents roles as string codes: `"1"` for Admin and
//! `"2"` for Staff. The dashboard only uses the role for display gating -
//! authorization is enforced by the API on every call.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Role of a warehouse user.
///
/// Decoding never fails: code `"1"` is Admin and every other code renders as
/// Staff, matching how the dashboard badges roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Role {
    /// Full access, including user management.
    Admin,
    /// Day-to-day warehouse operations.
    #[default]
    Staff,
}

/// Wire code for the Admin role.
pub const ADMIN_CODE: &str = "1";

/// Wire code for the Staff role.
pub const STAFF_CODE: &str = "2";

impl Role {
    /// Map an API role code to a role.
    ///
    /// `"1"` is Admin; any other code (including unknown ones) is Staff.
    #[must_use]
    pub fn from_code(code: &str) -> Self {
        if code == ADMIN_CODE {
            Self::Admin
        } else {
            Self::Staff
        }
    }

    /// The wire code sent back to the API.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Admin => ADMIN_CODE,
            Self::Staff => STAFF_CODE,
        }
    }

    /// Badge label shown in tables ("Admin" / "Staff").
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Admin => "Admin",
            Self::Staff => "Staff",
        }
    }

    /// Lowercase label shown in the profile menu ("admin" / "staff").
    #[must_use]
    pub const fn label_lower(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Staff => "staff",
        }
    }

    /// Whether this role is the Admin role.
    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for Role {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = String::deserialize(deserializer)?;
        Ok(Self::from_code(&code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_code_maps_to_admin() {
        assert_eq!(Role::from_code("1"), Role::Admin);
        assert!(Role::from_code("1").is_admin());
    }

    #[test]
    fn test_staff_code_maps_to_staff() {
        assert_eq!(Role::from_code("2"), Role::Staff);
    }

    #[test]
    fn test_unknown_codes_render_as_staff() {
        // Display rule: anything that is not "1" gets the non-admin badge.
        assert_eq!(Role::from_code("3"), Role::Staff);
        assert_eq!(Role::from_code(""), Role::Staff);
        assert_eq!(Role::from_code("admin"), Role::Staff);
    }

    #[test]
    fn test_labels() {
        assert_eq!(Role::Admin.label(), "Admin");
        assert_eq!(Role::Staff.label(), "Staff");
        assert_eq!(Role::Admin.label_lower(), "admin");
        assert_eq!(Role::Staff.label_lower(), "staff");
    }

    #[test]
    fn test_serde_uses_wire_codes() {
        let admin: Role = serde_json::from_str("\"1\"").expect("deserialize role");
        assert_eq!(admin, Role::Admin);
        assert_eq!(
            serde_json::to_string(&Role::Staff).expect("serialize role"),
            "\"2\""
        );
    }
}
