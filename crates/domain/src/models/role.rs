//! Governance roles.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Administrative role a user can hold over a city.
///
/// The set is closed; authority between roles lives in
/// [`crate::services::role_policy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GovRole {
    Mayor,
    Deputy,
    Moderator,
}

impl GovRole {
    /// All declared roles.
    pub const ALL: [GovRole; 3] = [GovRole::Mayor, GovRole::Deputy, GovRole::Moderator];

    /// Canonical wire/storage representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            GovRole::Mayor => "mayor",
            GovRole::Deputy => "deputy",
            GovRole::Moderator => "moderator",
        }
    }

    /// Parses a role string, rejecting anything outside the declared set.
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s {
            "mayor" => Ok(GovRole::Mayor),
            "deputy" => Ok(GovRole::Deputy),
            "moderator" => Ok(GovRole::Moderator),
            other => Err(DomainError::InvalidRole(other.to_string())),
        }
    }
}

impl std::fmt::Display for GovRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_declared_roles() {
        for role in GovRole::ALL {
            assert_eq!(GovRole::parse(role.as_str()).unwrap(), role);
        }
    }

    #[test]
    fn test_parse_rejects_unknown() {
        for bad in ["", "owner", "MAYOR", "Mayor", "admin", "mayor "] {
            let result = GovRole::parse(bad);
            assert!(
                matches!(result, Err(DomainError::InvalidRole(_))),
                "expected invalid_role for {:?}",
                bad
            );
        }
    }

    #[test]
    fn test_serde_round_trip() {
        let json = serde_json::to_string(&GovRole::Mayor).unwrap();
        assert_eq!(json, "\"mayor\"");
        let parsed: GovRole = serde_json::from_str("\"deputy\"").unwrap();
        assert_eq!(parsed, GovRole::Deputy);
    }

    #[test]
    fn test_display() {
        assert_eq!(GovRole::Moderator.to_string(), "moderator");
    }
}
