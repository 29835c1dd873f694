//! Stores functionality that should be shared between the HR admin clients
//!
//! The session lives in a [`Navigator`] which is the context handed to
//! anything that needs to know who is logged in. It restores the persisted
//! session on boot and runs the route guard on every navigation.
//!
//! NB: The API client assumes the async runtime has already been started
//! before any of its requests are sent

#![warn(unused_crate_dependencies)]


mod client;
pub mod navigation;
mod navigator;
mod restore;
pub mod routes;
pub mod session;
pub mod storage;

pub use client::{Client, UiCallBack, NO_ARGUMENTS};
pub use navigator::{Navigator, Rendered};
pub use restore::Restoration;
pub use routes::{decide, Decision, View};
pub use session::{Session, SessionStore};
pub use storage::{MemoryStorage, SessionStorage};
