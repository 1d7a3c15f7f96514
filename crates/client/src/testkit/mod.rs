//! In-process doubles for exercising the client without a server
//!
//! [`MockTransport`] replays queued responses and records every request it is
//! handed, so tests can assert on signed headers and count network calls.
//! [`FixedClock`] pins request timestamps.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use vcider::testkit::{FixedClock, MockTransport};
//!
//! let transport = Arc::new(MockTransport::new());
//! transport.push_json(StatusCode::OK, json!({ "links": {} }));
//!
//! let api = ApiClient::with_transport(base, credential, transport.clone(), Arc::new(FixedClock::new(0)))?;
//! let graph = ResourceGraph::new(api);
//! graph.root().await?;
//! assert_eq!(transport.calls(), 1);
//! ```
mod clock;
mod transport;

pub use clock::FixedClock;
pub use transport::MockTransport;
