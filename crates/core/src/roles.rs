//! Roles carried in the `role` JWT claim.

use std::fmt;
use std::str::FromStr;

use crate::choices::UnknownChoice;

/// Operators: catalog writes plus the admin surface (flags, corrections).
pub const ROLE_ADMIN: &str = "admin";
/// Catalog editors: manufacturer, engine, and aircraft writes only.
pub const ROLE_EDITOR: &str = "editor";

/// All roles a token may be issued for.
pub const VALID_ROLES: &[&str] = &[ROLE_ADMIN, ROLE_EDITOR];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Admin,
    Editor,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => ROLE_ADMIN,
            Role::Editor => ROLE_EDITOR,
        }
    }

    /// Whether this role may use the `/v1/admin` surface.
    pub fn can_administer(self) -> bool {
        self == Role::Admin
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownChoice;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ROLE_ADMIN => Ok(Role::Admin),
            ROLE_EDITOR => Ok(Role::Editor),
            _ => Err(UnknownChoice {
                kind: "Role",
                value: s.to_string(),
                expected: VALID_ROLES.join(", "),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_valid_role_parses() {
        for name in VALID_ROLES {
            assert_eq!(name.parse::<Role>().unwrap().as_str(), *name);
        }
    }

    #[test]
    fn role_names_are_case_sensitive() {
        assert!("Admin".parse::<Role>().is_err());
        assert!("viewer".parse::<Role>().is_err());
    }

    #[test]
    fn only_admin_can_administer() {
        assert!(Role::Admin.can_administer());
        assert!(!Role::Editor.can_administer());
    }
}
