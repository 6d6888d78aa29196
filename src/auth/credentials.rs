use log::info;
use reqwest::Url;

use crate::error::{Error, Result};

/// Everything a login needs, assembled by the command layer.
#[derive(Debug, Clone)]
pub struct LoginRequest {
    pub auth_url: String,
    pub client_id: String,
    pub client_secret: String,
    pub user_id: String,
    pub user_password: String,
    pub scope: String,
    pub grant_type: String,
}

impl LoginRequest {
    pub fn from_command_line(
        auth_url: String,
        client_id: String,
        client_secret: String,
        user_id: String,
        user_password: String,
        scope: String,
        grant_type: String,
    ) -> Result<LoginRequest> {
        info!("Using command line parameters");

        let request = LoginRequest {
            auth_url,
            client_id,
            client_secret,
            user_id,
            user_password,
            scope,
            grant_type,
        };
        request.validate()?;
        Ok(request)
    }

    /// Checks required fields before anything touches the network.
    pub fn validate(&self) -> Result<()> {
        validate_server_url("--auth-url", &self.auth_url)?;

        if self.client_id.is_empty() {
            return Err(Error::validation("--client-id is required"));
        }
        if self.client_secret.is_empty() {
            return Err(Error::validation("--client-secret is required"));
        }
        if self.user_id.is_empty() {
            return Err(Error::validation("--id is required"));
        }
        if self.user_password.is_empty() {
            return Err(Error::validation("--pwd is required"));
        }

        Ok(())
    }
}

/// Parses `url` and insists on an http(s) scheme.
pub fn validate_server_url(flag: &str, url: &str) -> Result<Url> {
    if url.is_empty() {
        return Err(Error::validation(format!(
            "{flag} is required and must be a valid OpenFx OAuth2 server"
        )));
    }

    let parsed = Url::parse(url)
        .map_err(|e| Error::validation(format!("{flag} is an invalid URL: {e}")))?;

    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        _ => Err(Error::validation(format!("{flag} is an invalid URL: {parsed}"))),
    }
}
