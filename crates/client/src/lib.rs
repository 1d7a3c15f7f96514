/**
 * Request authentication.
 *  - API credentials (id + secret)
 *  - Canonical request construction and HMAC signing
 *  - The matching server-side verifier
 */
pub mod crypto;
/**
 * Signed HTTP transport.
 * Wraps a pluggable send capability and signs
 *  every request that goes through it.
 */
pub mod transport;
/**
 * Hypermedia navigation over the root document.
 *  Link names are resolved to URIs at call time,
 *  so no URI layout has to be hard-coded.
 */
pub mod graph;
/**
 * Typed handles for the resources a link points at
 *  (node and network collections, single items).
 */
pub mod resource;
/**
 * In-process doubles for the transport and the clock.
 */
pub mod testkit;

mod client;
mod error;

pub use client::{Client, NETWORKS_LINK, NODES_LINK};
pub use error::{ApiError, ConfigurationError};

pub mod prelude {
    pub use crate::client::Client;
    pub use crate::crypto::{Credential, RequestSigner, Signature, SignatureVerifier};
    pub use crate::error::{ApiError, ConfigurationError};
    pub use crate::graph::{Document, LinkDescriptor, ResourceGraph, RootDocument};
    pub use crate::resource::{ListEntry, ResourceProxy};
    pub use crate::transport::{ApiClient, HttpSend, Method, ReqwestTransport, Response};
}
