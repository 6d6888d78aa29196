use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Every failure the authentication subsystem can report to the command layer.
#[derive(Debug, Error)]
pub enum Error {
    /// Missing or malformed input, caught before any I/O happens.
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Filesystem(#[from] FilesystemError),
    #[error("cannot reach {url}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
    #[error("failed to set up the HTTP client")]
    HttpClient(#[source] reqwest::Error),
    #[error("failed to write command output")]
    Output(#[source] std::io::Error),
}

impl Error {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}

/// The credential file is absent or does not hold what we expect.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("can't create a credential store with an empty file path")]
    EmptyPath,
    #[error("credential file does not exist: {}", .0.display())]
    NotFound(PathBuf),
    #[error("failed to read credential file {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse credential file {}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("no credential stored in {}; run `openfx-cli function login` first", .0.display())]
    NoCredential(PathBuf),
}

#[derive(Debug, Error)]
pub enum FilesystemError {
    #[error("unable to resolve the user's home directory")]
    HomeDirUnavailable,
    #[error("failed to create directory {}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to create file {}", .path.display())]
    CreateFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write {}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize credentials")]
    Serialize(#[source] serde_yaml::Error),
}

/// The authorization server answered, but not with what we asked for.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("[Information Error] The client information is incorrect (HTTP {status}): {body}")]
    Rejected { status: StatusCode, body: String },
    #[error("unable to parse server response: {body}")]
    Unparseable {
        body: String,
        #[source]
        source: serde_json::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_message_carries_status_and_body() {
        let err = Error::from(ProtocolError::Rejected {
            status: StatusCode::UNAUTHORIZED,
            body: "invalid_client".to_string(),
        });

        let message = err.to_string();
        assert!(message.contains("401"));
        assert!(message.contains("invalid_client"));
    }

    #[test]
    fn unparseable_keeps_raw_body() {
        let source = serde_json::from_str::<serde_json::Value>("{oops").unwrap_err();
        let err = ProtocolError::Unparseable {
            body: "{oops".to_string(),
            source,
        };

        assert_eq!(err.to_string(), "unable to parse server response: {oops");
        assert!(std::error::Error::source(&err).is_some());
    }
}
