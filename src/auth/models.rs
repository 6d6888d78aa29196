use std::io::{self, Write};

use serde::{Deserialize, Serialize};

/// JSON body of the token request.
#[derive(Debug, Serialize)]
pub struct ClientCredentialsBody<'a> {
    pub client_id: &'a str,
    pub client_secret: &'a str,
    pub grant_type: &'a str,
}

/// Successful answer from `/token`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: String,
    #[serde(default)]
    pub expires_in: i64,
    #[serde(default)]
    pub scope: String,
}

/// What `/verify` knows about a token.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TokenInfo {
    pub client_id: String,
    pub expires_in: i64,
    pub scope: String,
    pub user_id: String,
    pub grade: String,
}

impl TokenInfo {
    pub fn render<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "Client ID             :  {}", self.client_id)?;
        writeln!(out, "User ID               :  {}", self.user_id)?;
        writeln!(out, "Allowed resources     :  {}", self.scope)?;
        writeln!(out, "Token valid time(sec) :  {}", self.expires_in)?;
        writeln!(out, "Grade                 :  {}", self.grade)?;
        Ok(())
    }
}
