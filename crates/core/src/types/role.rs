//! Account roles carried in credential claims.

use core::fmt;

use serde::{Deserialize, Serialize};

/// The role claim of a signed-in account.
///
/// Only `ADMIN` has meaning to the client; any other value is kept verbatim
/// in [`Role::Other`] so it can still be logged or displayed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    /// Administrator (`"ADMIN"`, exact match).
    Admin,
    /// Any other role string.
    Other(String),
}

impl Role {
    /// Wire value for the administrator role.
    pub const ADMIN: &'static str = "ADMIN";

    /// Returns the role as it appears on the wire.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Admin => Self::ADMIN,
            Self::Other(role) => role,
        }
    }
}

impl From<String> for Role {
    fn from(value: String) -> Self {
        if value == Self::ADMIN {
            Self::Admin
        } else {
            Self::Other(value)
        }
    }
}

impl From<&str> for Role {
    fn from(value: &str) -> Self {
        Self::from(value.to_owned())
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        match role {
            Role::Admin => Role::ADMIN.to_owned(),
            Role::Other(role) => role,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_is_exact_match() {
        assert_eq!(Role::from("ADMIN"), Role::Admin);
        assert_eq!(Role::from("admin"), Role::Other("admin".to_owned()));
        assert_eq!(Role::from(" ADMIN"), Role::Other(" ADMIN".to_owned()));
    }

    #[test]
    fn test_serde_uses_wire_value() {
        let role: Role = serde_json::from_str("\"USER\"").unwrap();
        assert_eq!(role, Role::Other("USER".to_owned()));
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"ADMIN\"");
    }
}
