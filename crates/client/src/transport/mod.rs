//! Signed HTTP transport
//!
//! [`ApiClient`] is the only place requests get signed. It owns the credential,
//! resolves request paths against the base URI, and hands a fully-formed
//! [`HttpRequest`] to whatever implements [`HttpSend`]. The default sender is
//! [`ReqwestTransport`]; tests swap in [`crate::testkit::MockTransport`].

mod client;
mod clock;
mod error;
mod http_client;
mod method;
mod response;

pub use client::{ApiClient, SERVER_INFO_PATH};
pub use clock::{Clock, SystemClock};
pub use error::TransportError;
pub use http_client::ReqwestTransport;
pub use method::{Method, UnsupportedMethod};
pub use response::{Response, EXCESSIVE_TIME_DRIFT};

use bytes::Bytes;
use http::HeaderMap;
use url::Url;

/// A request ready to go on the wire
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl HttpRequest {
    /// Path plus query, as the server will see it
    pub fn path_and_query(&self) -> String {
        match self.url.query() {
            Some(query) => format!("{}?{}", self.url.path(), query),
            None => self.url.path().to_string(),
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// The send-one-request capability the client is built on
///
/// Implementations perform exactly one exchange per call: no retries, no
/// redirect following, no status interpretation.
#[async_trait::async_trait]
pub trait HttpSend: Send + Sync + std::fmt::Debug {
    async fn send(&self, request: HttpRequest) -> Result<Response, TransportError>;
}
