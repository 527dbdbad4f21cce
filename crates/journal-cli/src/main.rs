//! journal - a command-line client for the shared journal service.
//!
//! Each invocation loads the saved session without contacting the server,
//! runs one command against the session store and exits. Only `list`
//! fetches entries.

mod cli;
mod output;

use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use journal_core::utils::truncate_string;
use journal_core::{ApiClient, Config, SessionState, SessionStore, StoreError, StorePolicy};

use cli::{Cli, Commands};
use output::format_entry_list;

// ============================================================================
// Constants
// ============================================================================

/// Log file name inside the cache directory
const LOG_FILE: &str = "journal.log";

/// Environment variable read instead of prompting for a password
const PASSWORD_ENV: &str = "JOURNAL_PASSWORD";

/// Longest entry preview echoed back after saving
const PREVIEW_LENGTH: usize = 60;

/// Initialize the tracing subscriber. Logs go to a file so stdout only
/// carries command output; stderr is used if the file can't be created.
fn init_tracing(log_dir: &Path) -> WorkerGuard {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let (writer, guard) = match std::fs::create_dir_all(log_dir) {
        Ok(()) => tracing_appender::non_blocking(tracing_appender::rolling::never(log_dir, LOG_FILE)),
        Err(_) => tracing_appender::non_blocking(std::io::stderr()),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .with(filter)
        .init();

    guard
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let loaded = Config::load();
    let config = loaded.as_ref().cloned().unwrap_or_default();
    let _guard = init_tracing(&config.cache_dir());
    if let Err(e) = &loaded {
        warn!(error = %format!("{:#}", e), "Failed to load config, using defaults");
    }
    info!(base_url = %config.base_url(), "journal starting");

    match run(cli.command, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Commands, mut config: Config) -> Result<()> {
    let api = ApiClient::from_config(&config).context("Failed to create API client")?;
    let mut store = SessionStore::new(Arc::new(api), config.open_storage(), StorePolicy::from(&config));
    let state = store.load_session();

    match command {
        Commands::Register { name, email } => {
            let password = read_password()?;
            store
                .register(&name, &email, &password)
                .await
                .map_err(user_error)?;
            println!("Registration successful! Please login.");
        }
        Commands::Login { email } => {
            let email = email
                .or_else(|| config.last_email.clone())
                .ok_or_else(|| anyhow!("No email given. Use `journal login --email <EMAIL>`."))?;
            let password = read_password()?;
            store.login(&email, &password).await.map_err(user_error)?;

            config.last_email = Some(email);
            if let Err(e) = config.save() {
                warn!(error = %format!("{:#}", e), "Failed to save config");
            }
            if let Some(user) = store.user() {
                println!("{}", user.greeting());
            }
        }
        Commands::List => {
            require_session(state)?;
            store.refresh().await.map_err(user_error)?;
            let snapshot = store.snapshot();
            println!("{}", format_entry_list(snapshot.entries, snapshot.user));
        }
        Commands::Add { text } => {
            require_session(state)?;
            if let Some(entry) = store.add_entry(text.join(" ")).await.map_err(user_error)? {
                println!("Saved: {}", truncate_string(&entry.text, PREVIEW_LENGTH));
            }
        }
        Commands::Logout => {
            store.logout();
            println!("Signed out.");
        }
        Commands::Whoami => match store.user() {
            Some(user) => println!("{}", user.greeting()),
            None => println!("Not logged in"),
        },
    }

    Ok(())
}

fn require_session(state: SessionState) -> Result<()> {
    match state {
        SessionState::LoggedIn => Ok(()),
        SessionState::LoggedOut => Err(anyhow!("Not logged in. Run `journal login` first.")),
    }
}

fn user_error(e: StoreError) -> anyhow::Error {
    anyhow!(e.user_message())
}

fn read_password() -> Result<String> {
    if let Ok(password) = std::env::var(PASSWORD_ENV) {
        return Ok(password);
    }
    rpassword::prompt_password("Password: ").context("Failed to read password")
}
