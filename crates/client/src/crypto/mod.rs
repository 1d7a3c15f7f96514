//! Request authentication for the vCider API
//!
//! Every request carries an HMAC over a canonical description of itself, keyed by
//! the secret half of the caller's [`Credential`]. The server recomputes the same
//! MAC and checks the timestamp against its clock-skew window, which bounds replay
//! without server-side nonce storage.
//!
//! # Wire format
//!
//! The canonical string is four newline-separated fields:
//!
//! ```text
//! METHOD \n PATH[?sorted-query] \n TIMESTAMP \n hex(sha256(body))
//! ```
//!
//! The signature is `hex(hmac_sha256(secret, canonical))` and is sent as
//!
//! ```text
//! Authorization: VCIDER <credential-id>:<signature>
//! X-Vcider-Timestamp: <timestamp>
//! ```
//!
//! Field order, separator and digest are fixed; changing any of them breaks
//! compatibility with the server.

mod credential;
mod signer;
mod verifier;

pub use credential::{Credential, CredentialError};
pub use signer::{
    body_digest, CanonicalRequest, RequestSigner, Signature, SignedHeaders, SigningError,
    AUTH_SCHEME, AUTHORIZATION_HEADER, EMPTY_BODY_DIGEST, SIGNATURE_SIZE, TIMESTAMP_HEADER,
};
pub use verifier::{SignatureVerifier, VerifyError, DEFAULT_MAX_SKEW_SECS};
