use http::StatusCode;

use crate::crypto::{CredentialError, SigningError};
use crate::transport::{Method, Response, TransportError};

/// Problems with how a client was put together
#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    #[error("invalid credential: {0}")]
    Credential(#[from] CredentialError),
    #[error("invalid base URI {uri:?}: {reason}")]
    BaseUri { uri: String, reason: String },
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),
    #[error("signing error: {0}")]
    Signing(#[from] SigningError),
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
    #[error("unknown link: {0}")]
    UnknownLink(String),
    #[error("{method} is not supported by link {link:?}")]
    OperationNotSupported { method: Method, link: String },
    #[error("invalid resource id: {0:?}")]
    InvalidResourceId(String),
    #[error("unexpected status {status} from {path}: {body}")]
    UnexpectedStatus {
        path: String,
        status: StatusCode,
        body: String,
    },
    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl From<CredentialError> for ApiError {
    fn from(e: CredentialError) -> Self {
        ApiError::Configuration(e.into())
    }
}

impl ApiError {
    pub(crate) fn unexpected(path: &str, response: &Response) -> Self {
        ApiError::UnexpectedStatus {
            path: path.to_string(),
            status: response.status(),
            body: response.text(),
        }
    }
}
