//! Command definitions

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "journal")]
#[command(about = "Our shared journal, from the terminal", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create an account (password is prompted, or read from JOURNAL_PASSWORD)
    Register {
        #[arg(long)]
        name: String,

        #[arg(long)]
        email: String,
    },

    /// Log in and remember the session
    Login {
        /// Defaults to the email used last time
        #[arg(long)]
        email: Option<String>,
    },

    /// Show all entries, newest first
    List,

    /// Add a new entry
    Add {
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        text: Vec<String>,
    },

    /// Forget the saved session
    Logout,

    /// Show who is logged in
    Whoami,
}
