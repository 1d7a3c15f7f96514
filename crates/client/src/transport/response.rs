use bytes::Bytes;
use http::header::LOCATION;
use http::{HeaderMap, StatusCode};
use serde::de::DeserializeOwned;

/// Marker the server puts in a 403 body when the request timestamp is outside
/// its skew window
pub const EXCESSIVE_TIME_DRIFT: &str = "Excessive time drift";

/// A server reply, passed back verbatim
///
/// Nothing here interprets the status; the helpers are opt-in conveniences for
/// callers that know what they expect.
#[derive(Debug, Clone)]
pub struct Response {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl Response {
    pub fn new(status: StatusCode, headers: HeaderMap, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers,
            body: body.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    pub fn into_body(self) -> Bytes {
        self.body
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Body as text, lossy for invalid UTF-8
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }

    /// The `Location` header, set by the server on a successful POST
    pub fn location(&self) -> Option<&str> {
        self.headers.get(LOCATION).and_then(|v| v.to_str().ok())
    }

    /// Whether the server refused the request because our clock is off
    pub fn is_excessive_time_drift(&self) -> bool {
        self.status == StatusCode::FORBIDDEN && self.text().contains(EXCESSIVE_TIME_DRIFT)
    }
}
