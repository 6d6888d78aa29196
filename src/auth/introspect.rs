use std::io::Write;

use log::debug;
use reqwest::{Client, Url};

use super::credentials::validate_server_url;
use super::models::TokenInfo;
use crate::error::{Error, ProtocolError, Result};

/// Asks the authorization server what it knows about an access token.
pub struct TokenIntrospector {
    client: Client,
}

impl TokenIntrospector {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn verify_url(server: &str, token: &str) -> Result<Url> {
        validate_server_url("--server", server)?;
        let mut url = Url::parse(&format!("{}/verify", server.trim_end_matches('/')))
            .map_err(|e| Error::validation(format!("cannot build verify URL from {server}: {e}")))?;
        url.query_pairs_mut().append_pair("access_token", token);
        Ok(url)
    }

    pub async fn introspect(&self, server: &str, token: &str) -> Result<TokenInfo> {
        let url = Self::verify_url(server, token)?;
        debug!("Verifying token against {}", server);

        let network_err = |source| Error::Network {
            url: server.to_string(),
            source,
        };

        let response = self.client.get(url).send().await.map_err(network_err)?;
        let status = response.status();
        debug!("Verify request status: {}", status);

        let text = response.text().await.map_err(network_err)?;

        if !status.is_success() {
            return Err(ProtocolError::Rejected { status, body: text }.into());
        }

        let info = serde_json::from_str(&text)
            .map_err(|source| ProtocolError::Unparseable { body: text.clone(), source })?;
        Ok(info)
    }

    /// Introspects and writes the result to `out`. Nothing is written
    /// unless the whole response parsed.
    pub async fn introspect_to<W: Write>(&self, server: &str, token: &str, out: &mut W) -> Result<TokenInfo> {
        let info = self.introspect(server, token).await?;
        info.render(out).map_err(Error::Output)?;
        Ok(info)
    }
}
