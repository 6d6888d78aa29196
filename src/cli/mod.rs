//! Command-line surface: argument parsing, defaults and dispatch.

pub mod app;
pub mod commands;

pub use app::{Cli, Commands};

use std::time::Duration;

use anyhow::Result;
use log::debug;

use crate::config::CredentialStore;
use commands::{function_command, gateway_command};

/// Runs the parsed command line against the default credential store.
pub async fn run(cli: Cli) -> Result<()> {
    let timeout = Duration::from_secs(cli.timeout);
    debug!("HTTP timeout set to {:?}", timeout);

    match cli.command {
        Commands::Function(args) => {
            let store = CredentialStore::from_env()?;
            function_command(args, &store, timeout).await
        }
        Commands::Gateway { gateway } => gateway_command(&gateway),
    }
}
