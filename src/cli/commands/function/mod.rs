//! `function` commands: login and token inspection.

use std::time::Duration;

use anyhow::Result;
use clap::{Args, Subcommand};
use log::warn;

use crate::config::{Credential, CredentialStore};

mod authinfo;
mod login;

pub use authinfo::{AuthinfoArgs, authinfo_command};
pub use login::{LoginArgs, login_command};

#[derive(Args)]
pub struct FunctionCommands {
    #[command(subcommand)]
    pub command: FunctionSubcommands,
}

#[derive(Subcommand)]
pub enum FunctionSubcommands {
    /// Get an access token from the OpenFx OAuth2 server
    Login(LoginArgs),
    /// Validate the access token
    Authinfo(AuthinfoArgs),
}

pub async fn function_command(
    args: FunctionCommands,
    store: &CredentialStore,
    timeout: Duration,
) -> Result<()> {
    match args.command {
        FunctionSubcommands::Login(login) => login_command(login, store, timeout).await,
        FunctionSubcommands::Authinfo(info) => {
            authinfo_command(info, store, timeout, &mut std::io::stdout()).await
        }
    }
}

/// Stored credential used to fill flags the user left out. A missing or
/// unreadable store only costs the defaults.
fn stored_defaults(store: &CredentialStore) -> Option<Credential> {
    match store.lookup() {
        Ok(credential) => Some(credential),
        Err(e) => {
            warn!("No stored credential to use as defaults: {}", e);
            None
        }
    }
}
