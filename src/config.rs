//! Fixed locations, defaults and gateway URL resolution.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use log::debug;

use crate::error::FilesystemError;

pub mod credentials;

pub use credentials::{Credential, CredentialFile, CredentialStore};

/// Directory under the user's home that holds the credential file.
pub const DEFAULT_DIR: &str = ".openfx";

/// Credential file name inside [`DEFAULT_DIR`].
pub const DEFAULT_FILE: &str = "config.yml";

/// Overrides the credential directory when set.
pub const CONFIG_DIR_ENV_VAR: &str = "OPENFX_CONFIG_DIR";

pub const DEFAULT_GATEWAY_URL: &str = "localhost:31113";

/// Selects the gateway when neither a flag nor a config value is given.
pub const GATEWAY_ENV_VAR: &str = "OPENFX_URL";

pub const DEFAULT_OAUTH2_SERVER: &str = "http://localhost:9096";

pub const DEFAULT_SCOPE: &str = "user-fn1";

pub const DEFAULT_GRANT: &str = "client_credentials";

pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Directory that holds the credential file: `$OPENFX_CONFIG_DIR` if set,
/// otherwise `~/.openfx`.
pub fn config_dir() -> Result<PathBuf, FilesystemError> {
    if let Ok(dir) = env::var(CONFIG_DIR_ENV_VAR) {
        if !dir.is_empty() {
            debug!("Using credential directory from {}: {}", CONFIG_DIR_ENV_VAR, dir);
            return Ok(PathBuf::from(dir));
        }
    }

    dirs::home_dir()
        .map(|home| home.join(DEFAULT_DIR))
        .ok_or(FilesystemError::HomeDirUnavailable)
}

/// Picks the gateway URL: an explicit argument, then the config file value,
/// then `$OPENFX_URL`, then the built-in default. Values equal to the
/// default count as unset. Trailing slashes are stripped.
pub fn gateway_url(argument: &str, config: &str) -> String {
    let env_url = env::var(GATEWAY_ENV_VAR).ok();
    resolve_gateway_url(argument, config, env_url.as_deref())
}

pub fn resolve_gateway_url(argument: &str, config: &str, env_url: Option<&str>) -> String {
    let url = if !argument.is_empty() && argument != DEFAULT_GATEWAY_URL {
        argument
    } else if !config.is_empty() && config != DEFAULT_GATEWAY_URL {
        config
    } else {
        match env_url {
            Some(url) if !url.is_empty() => url,
            _ => DEFAULT_GATEWAY_URL,
        }
    };

    url.trim_end_matches('/').to_string()
}
