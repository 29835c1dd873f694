//! Code shared between the HR admin clients

#![warn(unused_crate_dependencies)]


pub mod const_config;
pub mod errors;
mod macros;
pub mod req_args;
pub mod token;
pub mod uac;

#[cfg(not(target_arch = "wasm32"))]
pub mod telemetry;
