use log::{debug, info, warn};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Url};

use super::credentials::{LoginRequest, validate_server_url};
use super::models::{ClientCredentialsBody, TokenResponse};
use super::CONTENT_TYPE_JSON;
use crate::config::{CredentialStore, DEFAULT_GRANT};
use crate::error::{Error, ProtocolError, Result};

/// Exchanges client and user credentials for an access token and persists it.
pub struct OpenFxAuthClient {
    client: Client,
    store: CredentialStore,
}

impl OpenFxAuthClient {
    pub fn new(client: Client, store: CredentialStore) -> Self {
        Self { client, store }
    }

    pub fn store(&self) -> &CredentialStore {
        &self.store
    }

    /// `<auth_url>/token` carrying the client and user parameters. The query
    /// always asks for the client-credentials grant; `--grant` only goes in
    /// the JSON body.
    pub fn token_url(request: &LoginRequest) -> Result<Url> {
        let base = validate_server_url("--auth-url", &request.auth_url)?;
        let mut url = base
            .join("/token")
            .map_err(|e| Error::validation(format!("cannot build token URL from {base}: {e}")))?;

        url.query_pairs_mut()
            .append_pair("client_id", &request.client_id)
            .append_pair("client_secret", &request.client_secret)
            .append_pair("grant_type", DEFAULT_GRANT)
            .append_pair("password", &request.user_password)
            .append_pair("username", &request.user_id);

        Ok(url)
    }

    /// Requests a token and stores it with the client identity on success.
    pub async fn login(&self, request: &LoginRequest) -> Result<TokenResponse> {
        let url = Self::token_url(request)?;
        debug!(
            "Requesting token from {} for client {} (grant {})",
            request.auth_url, request.client_id, request.grant_type
        );

        let body = ClientCredentialsBody {
            client_id: &request.client_id,
            client_secret: &request.client_secret,
            grant_type: &request.grant_type,
        };

        let network_err = |source| Error::Network {
            url: request.auth_url.clone(),
            source,
        };

        let response = self
            .client
            .get(url)
            .header(CONTENT_TYPE, CONTENT_TYPE_JSON)
            .json(&body)
            .send()
            .await
            .map_err(network_err)?;

        let status = response.status();
        debug!("Token request status: {}", status);

        let text = response.text().await.map_err(network_err)?;

        if !status.is_success() {
            return Err(ProtocolError::Rejected { status, body: text }.into());
        }

        let token: TokenResponse = serde_json::from_str(&text)
            .map_err(|source| ProtocolError::Unparseable { body: text.clone(), source })?;

        if !token.scope.is_empty() && token.scope != request.scope {
            warn!(
                "Requested scope '{}' but the server granted '{}'",
                request.scope, token.scope
            );
        }

        self.store
            .update(&request.client_id, &request.client_secret, &token.access_token)?;

        info!("Access token obtained for client {}", request.client_id);
        Ok(token)
    }
}
