use std::collections::VecDeque;

use bytes::Bytes;
use http::header::{HeaderValue, CONTENT_TYPE, LOCATION};
use http::{HeaderMap, StatusCode};
use parking_lot::Mutex;

use crate::transport::{HttpRequest, HttpSend, Response, TransportError};

/// Scripted [`HttpSend`]
///
/// Responses are served first-in first-out. When the queue runs dry the call
/// fails with a connect error, so an unexpected request shows up as a test
/// failure instead of a silent default.
#[derive(Debug, Default)]
pub struct MockTransport {
    replies: Mutex<VecDeque<Result<Response, TransportError>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_response(&self, response: Response) {
        self.replies.lock().push_back(Ok(response));
    }

    pub fn push_status(&self, status: StatusCode) {
        self.push_response(Response::new(status, HeaderMap::new(), Bytes::new()));
    }

    pub fn push_body(&self, status: StatusCode, body: impl Into<Bytes>) {
        self.push_response(Response::new(status, HeaderMap::new(), body));
    }

    pub fn push_json(&self, status: StatusCode, value: serde_json::Value) {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        self.push_response(Response::new(status, headers, value.to_string()));
    }

    /// A `201 Created` pointing at `location`
    pub fn push_created(&self, location: &str) {
        let mut headers = HeaderMap::new();
        if let Ok(value) = HeaderValue::from_str(location) {
            headers.insert(LOCATION, value);
        }
        self.push_response(Response::new(StatusCode::CREATED, headers, Bytes::new()));
    }

    pub fn push_error(&self, error: TransportError) {
        self.replies.lock().push_back(Err(error));
    }

    /// Number of requests sent so far
    pub fn calls(&self) -> usize {
        self.requests.lock().len()
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().clone()
    }

    pub fn last_request(&self) -> Option<HttpRequest> {
        self.requests.lock().last().cloned()
    }
}

#[async_trait::async_trait]
impl HttpSend for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<Response, TransportError> {
        let path = request.path_and_query();
        self.requests.lock().push(request);
        self.replies.lock().pop_front().unwrap_or_else(|| {
            Err(TransportError::Connect(format!(
                "no response queued for {}",
                path
            )))
        })
    }
}
