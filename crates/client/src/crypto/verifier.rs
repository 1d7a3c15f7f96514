//! Server-side check of a signed request
//!
//! Recomputes the MAC from the same canonical string the client signed and
//! compares it in constant time. The timestamp must fall inside a symmetric
//! skew window around the verifier's clock, so both replays of old requests
//! and requests dated in the future are refused.

use hmac::Mac;

use super::credential::Credential;
use super::signer::{keyed_mac, CanonicalRequest, Signature, SigningError, AUTH_SCHEME};
use crate::transport::Method;

/// Accepted clock difference between client and server, in seconds
pub const DEFAULT_MAX_SKEW_SECS: i64 = 300;

#[derive(Debug, thiserror::Error)]
pub enum VerifyError {
    #[error("malformed authorization header")]
    MalformedAuthorization,
    #[error("malformed timestamp header: {0:?}")]
    MalformedTimestamp(String),
    #[error("credential id mismatch: {0}")]
    UnknownCredential(String),
    #[error("stale request: timestamp {timestamp} is {age}s behind server time")]
    Stale { timestamp: i64, age: i64 },
    #[error("request from the future: timestamp {timestamp} is {ahead}s ahead of server time")]
    FutureDated { timestamp: i64, ahead: i64 },
    #[error("signature mismatch")]
    BadSignature,
    #[error("signing error: {0}")]
    Signing(#[from] SigningError),
}

#[derive(Debug, Clone)]
pub struct SignatureVerifier {
    max_skew: i64,
}

impl Default for SignatureVerifier {
    fn default() -> Self {
        Self {
            max_skew: DEFAULT_MAX_SKEW_SECS,
        }
    }
}

impl SignatureVerifier {
    pub fn new(max_skew_secs: i64) -> Self {
        Self {
            max_skew: max_skew_secs.abs(),
        }
    }

    pub fn max_skew(&self) -> i64 {
        self.max_skew
    }

    /// Verify the `Authorization` and timestamp header values of a request
    ///
    /// `now` is the verifier's current time in seconds since the epoch.
    #[allow(clippy::too_many_arguments)]
    pub fn verify(
        &self,
        credential: &Credential,
        method: Method,
        path: &str,
        body: &[u8],
        authorization: &str,
        timestamp: &str,
        now: i64,
    ) -> Result<(), VerifyError> {
        let (id, encoded) = parse_authorization(authorization)?;
        if id != credential.id() {
            return Err(VerifyError::UnknownCredential(id.to_string()));
        }

        let timestamp: i64 = timestamp
            .trim()
            .parse()
            .map_err(|_| VerifyError::MalformedTimestamp(timestamp.to_string()))?;
        self.check_window(timestamp, now)?;

        let signature =
            Signature::from_hex(encoded).map_err(|_| VerifyError::MalformedAuthorization)?;
        let canonical = CanonicalRequest::new(method, path, timestamp, body)?;
        keyed_mac(credential.secret(), &canonical)?
            .verify_slice(signature.bytes())
            .map_err(|_| VerifyError::BadSignature)
    }

    fn check_window(&self, timestamp: i64, now: i64) -> Result<(), VerifyError> {
        let delta = now.saturating_sub(timestamp);
        if delta > self.max_skew {
            return Err(VerifyError::Stale {
                timestamp,
                age: delta,
            });
        }
        if -delta > self.max_skew {
            return Err(VerifyError::FutureDated {
                timestamp,
                ahead: -delta,
            });
        }
        Ok(())
    }
}

/// Split `VCIDER <id>:<signature>` into its id and encoded signature
fn parse_authorization(value: &str) -> Result<(&str, &str), VerifyError> {
    let rest = value
        .strip_prefix(AUTH_SCHEME)
        .and_then(|rest| rest.strip_prefix(' '))
        .ok_or(VerifyError::MalformedAuthorization)?;
    match rest.split_once(':') {
        Some((id, signature)) if !id.is_empty() && !signature.is_empty() => Ok((id, signature)),
        _ => Err(VerifyError::MalformedAuthorization),
    }
}
