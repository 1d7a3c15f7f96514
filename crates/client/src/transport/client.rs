use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use bytes::Bytes;
use http::header::{HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE};
use http::HeaderMap;
use serde::Deserialize;
use url::Url;

use super::{Clock, HttpRequest, HttpSend, Method, ReqwestTransport, Response, SystemClock};
use crate::crypto::{Credential, RequestSigner, SigningError};
use crate::error::{ApiError, ConfigurationError};

/// Where the server publishes its clock, relative to the base URI
pub const SERVER_INFO_PATH: &str = "server_info/";

/// Low-level signed client for the vCider API
///
/// Knows how to issue properly authenticated requests, but nothing about the
/// resources behind them. Cloning is cheap; clones share the credential, the
/// transport and the learned clock offset.
///
/// Paths starting with `/` are taken as-is against the server origin; relative
/// paths are appended to the base URI's path, so with a base of
/// `https://my.vcider.com/api` both `/api/nodes/` and `nodes/` reach the same
/// resource.
#[derive(Debug, Clone)]
pub struct ApiClient {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    base: Url,
    signer: RequestSigner,
    transport: Arc<dyn HttpSend>,
    clock: Arc<dyn Clock>,
    time_offset: AtomicI64,
}

#[derive(Debug, Deserialize)]
struct ServerInfo {
    volatile: ServerVolatile,
}

#[derive(Debug, Deserialize)]
struct ServerVolatile {
    server_time: serde_json::Value,
}

impl ApiClient {
    /// Client over reqwest and the system clock
    pub fn new(
        base_uri: &str,
        api_id: impl Into<String>,
        api_secret: impl AsRef<[u8]>,
    ) -> Result<Self, ApiError> {
        let credential = Credential::new(api_id, api_secret)?;
        let transport = ReqwestTransport::new(None)?;
        Self::with_transport(
            base_uri,
            credential,
            Arc::new(transport),
            Arc::new(SystemClock),
        )
    }

    pub fn with_transport(
        base_uri: &str,
        credential: Credential,
        transport: Arc<dyn HttpSend>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, ApiError> {
        Ok(Self {
            inner: Arc::new(Inner {
                base: normalize_base(base_uri)?,
                signer: RequestSigner::new(credential),
                transport,
                clock,
                time_offset: AtomicI64::new(0),
            }),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.inner.base
    }

    pub fn credential_id(&self) -> &str {
        self.inner.signer.credential_id()
    }

    /// Seconds our clock runs ahead of the server's
    pub fn time_offset(&self) -> i64 {
        self.inner.time_offset.load(Ordering::Relaxed)
    }

    pub fn set_time_offset(&self, offset: i64) {
        self.inner.time_offset.store(offset, Ordering::Relaxed);
    }

    /// Timestamp the next request will carry
    pub fn timestamp(&self) -> i64 {
        self.inner.clock.now() - self.time_offset()
    }

    /// Absolute request path for `uri`
    ///
    /// `"/"` and `""` both mean the base path itself.
    pub fn resolve_path(&self, uri: &str) -> String {
        match uri {
            // A bare "/" names the API root, not the server origin
            "" | "/" => self.inner.base.path().to_string(),
            absolute if absolute.starts_with('/') => absolute.to_string(),
            relative => format!("{}{}", self.inner.base.path(), relative),
        }
    }

    pub async fn get(&self, path: &str) -> Result<Response, ApiError> {
        self.send(Method::Get, path, Bytes::new()).await
    }

    pub async fn put(&self, path: &str, body: impl Into<Bytes>) -> Result<Response, ApiError> {
        self.send(Method::Put, path, body.into()).await
    }

    pub async fn post(&self, path: &str, body: impl Into<Bytes>) -> Result<Response, ApiError> {
        self.send(Method::Post, path, body.into()).await
    }

    pub async fn delete(&self, path: &str) -> Result<Response, ApiError> {
        self.send(Method::Delete, path, Bytes::new()).await
    }

    pub async fn send(
        &self,
        method: Method,
        path: &str,
        body: Bytes,
    ) -> Result<Response, ApiError> {
        self.send_at(method, path, body, self.timestamp()).await
    }

    /// Sign with an explicit timestamp and send
    ///
    /// Exactly one call to the transport; the response comes back whatever its
    /// status.
    pub async fn send_at(
        &self,
        method: Method,
        path: &str,
        body: Bytes,
        timestamp: i64,
    ) -> Result<Response, ApiError> {
        let request = self.build_request(method, path, body, timestamp)?;
        let request_path = request.path_and_query();
        tracing::debug!(%method, path = %request_path, timestamp, "sending signed request");

        let response = self.inner.transport.send(request).await?;
        tracing::debug!(%method, path = %request_path, status = %response.status(), "received response");
        Ok(response)
    }

    /// Resolve, sign and assemble a request without sending it
    pub fn build_request(
        &self,
        method: Method,
        path: &str,
        body: Bytes,
        timestamp: i64,
    ) -> Result<HttpRequest, ApiError> {
        let resolved = self.resolve_path(path);
        // url parsing silently drops line breaks, so catch them first
        if resolved.contains(['\n', '\r']) {
            return Err(SigningError::MalformedPath {
                path: resolved,
                reason: "contains a line break",
            }
            .into());
        }
        let url = self
            .inner
            .base
            .join(&resolved)
            .map_err(|_| SigningError::MalformedPath {
                path: resolved.clone(),
                reason: "not a valid URI path",
            })?;
        // `//host/...` joins as a new authority
        if url.origin() != self.inner.base.origin() {
            return Err(SigningError::MalformedPath {
                path: resolved,
                reason: "leaves the API origin",
            }
            .into());
        }

        let mut request = HttpRequest {
            method,
            url,
            headers: default_headers(),
            body,
        };

        // Sign what actually goes on the wire, after url normalization
        let (_, signed) = self.inner.signer.sign(
            method,
            &request.path_and_query(),
            timestamp,
            &request.body,
        )?;
        for (name, value) in signed.pairs() {
            let value = HeaderValue::from_str(value).map_err(|_| SigningError::InvalidHeader)?;
            request.headers.insert(HeaderName::from_static(name), value);
        }

        Ok(request)
    }

    /// Learn the offset between our clock and the server's
    ///
    /// Reads `volatile.server_time` from the server info resource and applies
    /// the difference to every later request. Returns the new offset.
    pub async fn time_sync(&self) -> Result<i64, ApiError> {
        let response = self.get(SERVER_INFO_PATH).await?;
        if !response.is_success() {
            return Err(ApiError::unexpected(
                &self.resolve_path(SERVER_INFO_PATH),
                &response,
            ));
        }

        let info: ServerInfo = response.json()?;
        let server_time = parse_server_time(&info.volatile.server_time)?;
        let offset = self.inner.clock.now() - server_time;
        self.set_time_offset(offset);
        tracing::debug!(offset, "synchronized clock with server");
        Ok(offset)
    }
}

fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers
}

/// Base URI with query and fragment dropped and a trailing `/` on the path
fn normalize_base(base_uri: &str) -> Result<Url, ConfigurationError> {
    let invalid = |reason: String| ConfigurationError::BaseUri {
        uri: base_uri.to_string(),
        reason,
    };

    let mut url = Url::parse(base_uri).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme {:?}", url.scheme())));
    }
    if url.cannot_be_a_base() || url.host().is_none() {
        return Err(invalid("missing host".to_string()));
    }

    url.set_query(None);
    url.set_fragment(None);
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

// The server has been seen sending this as a number and as a string
fn parse_server_time(value: &serde_json::Value) -> Result<i64, ApiError> {
    let parsed = match value {
        serde_json::Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok().map(|f| f as i64),
        _ => None,
    };
    parsed.ok_or_else(|| {
        ApiError::Decode(serde::de::Error::custom(format!(
            "invalid server_time: {}",
            value
        )))
    })
}
