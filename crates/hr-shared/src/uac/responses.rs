use super::User;
use crate::token::AuthToken;

/// Body returned by the API on a successful login
#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq)]
pub struct LoginResponse {
    pub user: User,
    pub token: AuthToken,
}
