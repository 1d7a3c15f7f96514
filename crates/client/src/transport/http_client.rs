use std::time::Duration;

use reqwest::redirect::Policy;
use reqwest::Client;

use super::{HttpRequest, HttpSend, Response, TransportError};

/// [`HttpSend`] backed by a pooled reqwest client
///
/// Redirects are not followed: a redirected request would carry a signature
/// computed for the original path.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Option<Duration>) -> Result<Self, TransportError> {
        let mut builder = Client::builder().redirect(Policy::none());
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
        })
    }

    pub fn from_client(client: Client) -> Self {
        Self { client }
    }

    /// Get the underlying HTTP client
    pub fn http_client(&self) -> &Client {
        &self.client
    }
}

#[async_trait::async_trait]
impl HttpSend for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<Response, TransportError> {
        let response = self
            .client
            .request(request.method.into(), request.url)
            .headers(request.headers)
            .body(request.body)
            .send()
            .await?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?;

        Ok(Response::new(status, headers, body))
    }
}
