#![warn(unused_crate_dependencies)]

pub mod cli;
pub mod commands;
pub mod configuration;
pub mod tracing;

/// Runtime the API requests are spawned on
pub fn create_runtime() -> std::io::Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
}
