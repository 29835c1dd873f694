use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    #[arg(
        short = 's',
        long = "stdout",
        action,
        help = "Controls if it logs to stdout/stderr instead of to a file"
    )]
    pub is_to_std_out: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Restore the saved session (if any) and show the first screen
    Boot {
        /// Path the app is opened at, defaults to the configured initial path
        path: Option<String>,
    },
    /// Log in against the API and save the session
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// End the session and delete it from storage
    Logout,
    /// Show what a path renders for the saved session
    Navigate { path: String },
    /// Print the saved session
    Status {
        /// Also ask the API whether the token is still accepted
        #[arg(long, action)]
        verify: bool,
    },
}
