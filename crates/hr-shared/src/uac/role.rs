use serde::{Deserialize, Serialize};

/// Role of an authenticated user. Drives which screens are reachable.
#[derive(
    Debug,
    Serialize,
    Deserialize,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    Admin,
    Employee,
}

impl Role {
    /// Returns `true` if the role is [`Admin`].
    ///
    /// [`Admin`]: Role::Admin
    #[must_use]
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::admin(Role::Admin, "admin")]
    #[case::employee(Role::Employee, "employee")]
    fn wire_format_matches_display(#[case] role: Role, #[case] expected: &str) {
        // Act
        let json = serde_json::to_string(&role).unwrap();

        // Assert
        assert_eq!(json, format!("\"{expected}\""));
        assert_eq!(role.to_string(), expected);
        assert_eq!(Role::from_str(expected).unwrap(), role);
    }

    #[rstest]
    #[case::unknown(r#""manager""#)]
    #[case::wrong_case(r#""Admin""#)]
    fn unknown_roles_rejected(#[case] json: &str) {
        assert!(serde_json::from_str::<Role>(json).is_err());
    }
}
