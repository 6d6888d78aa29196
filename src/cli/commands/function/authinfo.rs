use std::io::Write;
use std::time::Duration;

use anyhow::Result;
use clap::Args;
use log::info;

use super::stored_defaults;
use crate::auth::{TokenIntrospector, http_client};
use crate::config::{CredentialStore, DEFAULT_OAUTH2_SERVER};
use crate::error::Error;

#[derive(Args, Debug)]
pub struct AuthinfoArgs {
    /// Access token, defaults to the stored one
    #[arg(long)]
    pub token: Option<String>,
    /// OAuth2 server URL
    #[arg(long, default_value = DEFAULT_OAUTH2_SERVER)]
    pub server: String,
}

pub async fn authinfo_command<W: Write>(
    args: AuthinfoArgs,
    store: &CredentialStore,
    timeout: Duration,
    out: &mut W,
) -> Result<()> {
    info!("Executing authinfo command");

    let token = match args.token {
        Some(token) => token,
        None => stored_defaults(store).map(|c| c.token).unwrap_or_default(),
    };
    if token.is_empty() {
        return Err(Error::validation(
            "--token is required; pass one or run `openfx-cli function login` first",
        )
        .into());
    }

    let introspector = TokenIntrospector::new(http_client(timeout)?);
    introspector.introspect_to(&args.server, &token, out).await?;
    Ok(())
}
