use std::fmt;
use std::ops::Deref;

use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

use super::credential::Credential;
use crate::transport::Method;

type HmacSha256 = Hmac<Sha256>;

/// Size of an HMAC-SHA256 output in bytes
pub const SIGNATURE_SIZE: usize = 32;
/// Scheme token at the start of the `Authorization` header value
pub const AUTH_SCHEME: &str = "VCIDER";
pub const AUTHORIZATION_HEADER: &str = "authorization";
pub const TIMESTAMP_HEADER: &str = "x-vcider-timestamp";
/// Digest of a zero-length body, used for GET and DELETE
pub const EMPTY_BODY_DIGEST: &str =
    "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

#[derive(Debug, thiserror::Error)]
pub enum SigningError {
    #[error("malformed request path {path:?}: {reason}")]
    MalformedPath { path: String, reason: &'static str },
    #[error("invalid MAC key: {0}")]
    InvalidKey(#[from] hmac::digest::InvalidLength),
    #[error("invalid signature encoding: {0}")]
    Encoding(#[from] hex::FromHexError),
    #[error("invalid signature size, expected {SIGNATURE_SIZE}, got {0}")]
    Size(usize),
    #[error("signed header is not a valid HTTP header value")]
    InvalidHeader,
}

/// Lower-case hex SHA-256 of a request body
pub fn body_digest(body: &[u8]) -> String {
    hex::encode(Sha256::digest(body))
}

/// The unambiguous description of a request that gets MAC'd
///
/// Fields are joined with `\n`, which can't appear in any of them: the method is
/// a fixed token, the timestamp and digest are numeric/hex, and paths with line
/// breaks are rejected. Query parameters are sorted so that their order on the
/// wire does not change the signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalRequest {
    method: Method,
    path: String,
    timestamp: i64,
    body_digest: String,
}

impl CanonicalRequest {
    pub fn new(
        method: Method,
        path: &str,
        timestamp: i64,
        body: &[u8],
    ) -> Result<Self, SigningError> {
        Ok(Self {
            method,
            path: canonical_path(path)?,
            timestamp,
            body_digest: body_digest(body),
        })
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    pub fn body_digest(&self) -> &str {
        &self.body_digest
    }
}

impl fmt::Display for CanonicalRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\n{}\n{}\n{}",
            self.method, self.path, self.timestamp, self.body_digest
        )
    }
}

fn canonical_path(path: &str) -> Result<String, SigningError> {
    let malformed = |reason| SigningError::MalformedPath {
        path: path.to_string(),
        reason,
    };

    if !path.starts_with('/') {
        return Err(malformed("must start with '/'"));
    }
    if path.contains(['\n', '\r']) {
        return Err(malformed("contains a line break"));
    }

    let mut parts = path.split('?');
    let base = parts.next().unwrap_or_default();
    let query = parts.next();
    if parts.next().is_some() {
        return Err(malformed("more than one '?'"));
    }

    match query {
        Some(query) if !query.is_empty() => {
            let mut pairs: Vec<&str> = query.split('&').collect();
            pairs.sort_unstable();
            Ok(format!("{}?{}", base, pairs.join("&")))
        }
        _ => Ok(base.to_string()),
    }
}

/// An HMAC-SHA256 request signature
///
/// Travels as lower-case hex; [`Signature::from_hex`] recovers the exact bytes.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Signature([u8; SIGNATURE_SIZE]);

impl Signature {
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub fn from_hex(encoded: &str) -> Result<Self, SigningError> {
        let bytes = hex::decode(encoded)?;
        Self::from_slice(&bytes)
    }

    pub fn from_slice(data: &[u8]) -> Result<Self, SigningError> {
        if data.len() != SIGNATURE_SIZE {
            return Err(SigningError::Size(data.len()));
        }
        let mut buff = [0; SIGNATURE_SIZE];
        buff.copy_from_slice(data);
        Ok(Self(buff))
    }

    pub fn bytes(&self) -> &[u8] {
        self.0.as_ref()
    }
}

impl Deref for Signature {
    type Target = [u8; SIGNATURE_SIZE];
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({})", self.to_hex())
    }
}

/// The two header values that authenticate a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedHeaders {
    /// `VCIDER <id>:<signature>`
    pub authorization: String,
    /// Decimal timestamp, identical to the one in the canonical string
    pub timestamp: String,
}

impl SignedHeaders {
    pub fn pairs(&self) -> [(&'static str, &str); 2] {
        [
            (AUTHORIZATION_HEADER, self.authorization.as_str()),
            (TIMESTAMP_HEADER, self.timestamp.as_str()),
        ]
    }
}

/// Signs requests on behalf of a single credential
#[derive(Debug, Clone)]
pub struct RequestSigner {
    credential: Credential,
}

impl RequestSigner {
    pub fn new(credential: Credential) -> Self {
        Self { credential }
    }

    pub fn credential_id(&self) -> &str {
        self.credential.id()
    }

    /// Sign a request at the given timestamp
    ///
    /// Pure: the same inputs always give the same signature. The caller picks
    /// the timestamp, which is how stale or future-dated requests get built in
    /// tests.
    pub fn sign(
        &self,
        method: Method,
        path: &str,
        timestamp: i64,
        body: &[u8],
    ) -> Result<(Signature, SignedHeaders), SigningError> {
        let canonical = CanonicalRequest::new(method, path, timestamp, body)?;
        tracing::trace!(%method, path = canonical.path(), timestamp, "canonical request");
        let signature = self.mac(&canonical)?;
        let headers = SignedHeaders {
            authorization: format!(
                "{} {}:{}",
                AUTH_SCHEME,
                self.credential.id(),
                signature.to_hex()
            ),
            timestamp: timestamp.to_string(),
        };
        Ok((signature, headers))
    }

    /// MAC a canonical request with this signer's secret
    pub fn mac(&self, canonical: &CanonicalRequest) -> Result<Signature, SigningError> {
        let mac = keyed_mac(self.credential.secret(), canonical)?;
        Signature::from_slice(&mac.finalize().into_bytes())
    }
}

/// HMAC-SHA256 keyed by `secret`, already fed the canonical string
pub(crate) fn keyed_mac(
    secret: &[u8],
    canonical: &CanonicalRequest,
) -> Result<HmacSha256, SigningError> {
    let mut mac = HmacSha256::new_from_slice(secret)?;
    mac.update(canonical.to_string().as_bytes());
    Ok(mac)
}
