//! Token acquisition and introspection against the OpenFx OAuth2 server.

use std::time::Duration;

use reqwest::Client;

use crate::error::{Error, Result};

pub mod client;
pub mod credentials;
pub mod introspect;
pub mod models;

pub use client::OpenFxAuthClient;
pub use credentials::LoginRequest;
pub use introspect::TokenIntrospector;
pub use models::{TokenInfo, TokenResponse};

pub const CONTENT_TYPE_JSON: &str = "application/json";

/// Shared HTTP client; every request is bounded by `timeout`.
pub fn http_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(10)))
        .user_agent(concat!("openfx-cli/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(Error::HttpClient)
}
