use hr_shared::telemetry;

use crate::cli::Cli;

const APP_NAME: &str = "hr_admin_cli";

/// Traces go to a file unless `--stdout` was passed, stdout itself only
/// carries command output
pub fn init(cli: &Cli) -> anyhow::Result<()> {
    if !cli.is_to_std_out {
        match telemetry::init_to_file(APP_NAME) {
            Ok(path) => {
                eprintln!("Tracing started to file {path:?}");
                return Ok(());
            }
            Err(e) => {
                // Fall through to logging to stderr
                eprintln!("Failed to start logging to file: {e:#}");
            }
        }
    }
    telemetry::init_to_stderr(APP_NAME)
}
