use std::fmt::Display;

use crate::errors::ConversionError;

use super::Role;

#[derive(
    Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq, Hash, PartialOrd, Ord,
)]
#[serde(try_from = "String", into = "String")]
/// Identifier assigned by the API, constrained to not be an empty string
pub struct UserId(String);

#[derive(
    Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq, Hash, PartialOrd, Ord,
)]
#[serde(try_from = "String", into = "String")]
pub struct DepartmentId(String);

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq)]
#[serde(try_from = "String", into = "String")]
pub struct DisplayName(String);

/// The authenticated user as returned by the API on login
#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub email: Email,
    pub name: DisplayName,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department_id: Option<DepartmentId>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

impl Email {
    pub const MAX_LENGTH: usize = 254;
}

impl DisplayName {
    pub const MAX_LENGTH: usize = 100;
}

fn non_empty(value: &str) -> Result<(), ConversionError> {
    if value.is_empty() {
        Err(ConversionError::Empty)
    } else {
        Ok(())
    }
}

fn within_max(value: &str, max: usize) -> Result<(), ConversionError> {
    let actual = value.chars().count();
    if actual > max {
        Err(ConversionError::MaxExceeded { max, actual })
    } else {
        Ok(())
    }
}

impl TryFrom<String> for UserId {
    type Error = ConversionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        non_empty(&value)?;
        Ok(Self(value))
    }
}

impl TryFrom<String> for DepartmentId {
    type Error = ConversionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        non_empty(&value)?;
        Ok(Self(value))
    }
}

impl TryFrom<String> for Email {
    type Error = ConversionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        non_empty(&value)?;
        within_max(&value, Self::MAX_LENGTH)?;
        match value.split_once('@') {
            Some((local, domain))
                if !local.is_empty() && !domain.is_empty() && !domain.contains('@') =>
            {
                Ok(Self(value))
            }
            _ => Err(ConversionError::InvalidEmail),
        }
    }
}

impl TryFrom<String> for DisplayName {
    type Error = ConversionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        non_empty(&value)?;
        within_max(&value, Self::MAX_LENGTH)?;
        Ok(Self(value))
    }
}

macro_rules! string_newtype_conversions {
    ($($name:ident),+) => {
        $(
            impl TryFrom<&str> for $name {
                type Error = ConversionError;

                fn try_from(value: &str) -> Result<Self, Self::Error> {
                    value.to_string().try_into()
                }
            }

            impl From<$name> for String {
                fn from(value: $name) -> Self {
                    value.0
                }
            }

            impl AsRef<str> for $name {
                fn as_ref(&self) -> &str {
                    &self.0
                }
            }

            impl Display for $name {
                fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                    write!(f, "{}", self.0)
                }
            }
        )+
    };
}

string_newtype_conversions!(UserId, DepartmentId, Email, DisplayName);

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::empty("", ConversionError::Empty)]
    #[case::no_at("someone.example.com", ConversionError::InvalidEmail)]
    #[case::no_local("@example.com", ConversionError::InvalidEmail)]
    #[case::no_domain("someone@", ConversionError::InvalidEmail)]
    #[case::two_at("a@b@c", ConversionError::InvalidEmail)]
    #[case::too_long(format!("{}@x.io", "a".repeat(250)), ConversionError::MaxExceeded{max:254, actual:255})]
    fn illegal_email(#[case] email: String, #[case] expect: ConversionError) {
        // Act
        let actual: Result<Email, ConversionError> = email.try_into();

        // Assert
        assert_eq!(actual.unwrap_err(), expect);
    }

    #[rstest]
    #[case::empty("", ConversionError::Empty)]
    #[case::too_long("a".repeat(101), ConversionError::MaxExceeded{max:100, actual:101})]
    fn illegal_display_name(#[case] name: String, #[case] expect: ConversionError) {
        // Act
        let actual: Result<DisplayName, ConversionError> = name.try_into();

        // Assert
        assert_eq!(actual.unwrap_err(), expect);
    }

    #[test]
    fn user_wire_format_is_camel_case() {
        // Arrange
        let json = r#"{"id":"7","email":"an@hr.io","name":"An","role":"employee","departmentId":"d1"}"#;

        // Act
        let user: User = serde_json::from_str(json).unwrap();

        // Assert
        assert_eq!(user.role, Role::Employee);
        assert_eq!(user.department_id.as_ref().unwrap().as_ref(), "d1");
        assert_eq!(serde_json::to_string(&user).unwrap(), json);
    }

    #[test]
    fn department_is_optional() {
        let json = r#"{"id":"1","email":"boss@hr.io","name":"Boss","role":"admin"}"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert!(user.is_admin());
        assert!(user.department_id.is_none());
    }

    #[test]
    fn invalid_field_fails_whole_user() {
        let json = r#"{"id":"","email":"boss@hr.io","name":"Boss","role":"admin"}"#;
        assert!(serde_json::from_str::<User>(json).is_err());
    }
}
