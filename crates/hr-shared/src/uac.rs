//! Shared items related to user account control

mod responses;
mod role;
mod user;

pub use responses::LoginResponse;
pub use role::Role;
pub use user::{DepartmentId, DisplayName, Email, User, UserId};
