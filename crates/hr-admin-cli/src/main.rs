#![warn(clippy::all, rust_2018_idioms)]

use anyhow::Context as _;
use clap::Parser as _;
use hr_admin_cli::configuration::{default_configuration_directory, get_configuration};

fn main() -> anyhow::Result<()> {
    let args = hr_admin_cli::cli::Cli::parse();

    if let Err(e) = hr_admin_cli::tracing::init(&args) {
        eprintln!("Failed to start tracing: {e}");
    }

    let configuration = get_configuration(&default_configuration_directory()?)
        .context("failed to read configuration")?;

    let rt = hr_admin_cli::create_runtime().context("unable to create runtime")?;
    rt.block_on(hr_admin_cli::commands::run(args.command, &configuration))
}
