use std::time::Duration;

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use log::info;

use super::stored_defaults;
use crate::auth::{LoginRequest, OpenFxAuthClient, http_client};
use crate::config::{CredentialStore, DEFAULT_GRANT, DEFAULT_OAUTH2_SERVER, DEFAULT_SCOPE};

#[derive(Args, Debug)]
pub struct LoginArgs {
    /// OAuth2 server URL
    #[arg(long, default_value = DEFAULT_OAUTH2_SERVER)]
    pub auth_url: String,
    /// OAuth2 client_id, defaults to the stored one
    #[arg(long)]
    pub client_id: Option<String>,
    /// OAuth2 client_secret, defaults to the stored one
    #[arg(long)]
    pub client_secret: Option<String>,
    /// OpenFx user ID
    #[arg(long = "id")]
    pub user_id: Option<String>,
    /// OpenFx user password
    #[arg(long = "pwd")]
    pub user_password: Option<String>,
    /// Scope for the OAuth2 flow
    #[arg(long, default_value = DEFAULT_SCOPE)]
    pub scope: String,
    /// Grant for the OAuth2 flow
    #[arg(long, default_value = DEFAULT_GRANT)]
    pub grant: String,
}

impl LoginArgs {
    /// Fills client identity gaps from the store, then validates.
    pub fn into_request(self, store: &CredentialStore) -> crate::Result<LoginRequest> {
        let (client_id, client_secret) = match (self.client_id, self.client_secret) {
            (Some(id), Some(secret)) => (id, secret),
            (id, secret) => {
                let stored = stored_defaults(store);
                let stored_id = stored.as_ref().map(|c| c.client_id.clone());
                let stored_secret = stored.map(|c| c.client_secret);
                (
                    id.or(stored_id).unwrap_or_default(),
                    secret.or(stored_secret).unwrap_or_default(),
                )
            }
        };

        LoginRequest::from_command_line(
            self.auth_url,
            client_id,
            client_secret,
            self.user_id.unwrap_or_default(),
            self.user_password.unwrap_or_default(),
            self.scope,
            self.grant,
        )
    }
}

pub async fn login_command(args: LoginArgs, store: &CredentialStore, timeout: Duration) -> Result<()> {
    info!("Executing login command");

    let request = args.into_request(store)?;
    let client = OpenFxAuthClient::new(http_client(timeout)?, store.clone());
    let token = client.login(&request).await?;

    info!(
        "Token of type '{}' valid for {}s",
        token.token_type, token.expires_in
    );
    println!("{} Successfully completed the certification.", "✓".green());
    println!("  Credential saved to {}", store.file_path().display());
    Ok(())
}
