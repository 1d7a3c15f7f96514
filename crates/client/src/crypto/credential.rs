use std::fmt;

/// Errors raised when a credential is rejected at construction
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CredentialError {
    #[error("credential id is empty")]
    EmptyId,
    #[error("credential id contains an invalid character: {0:?}")]
    InvalidId(char),
    #[error("credential secret is empty")]
    EmptySecret,
}

/// An API credential: the public id and the shared secret
///
/// The id is embedded in the `Authorization` header as `<id>:<signature>`, so it
/// is limited to visible ASCII other than `:`. The secret never leaves this struct except
/// as MAC key material; `Debug` redacts it and there is no `Serialize` impl.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    id: String,
    secret: Vec<u8>,
}

impl Credential {
    /// Build a credential, validating both halves
    pub fn new(id: impl Into<String>, secret: impl AsRef<[u8]>) -> Result<Self, CredentialError> {
        let id = id.into();
        if id.is_empty() {
            return Err(CredentialError::EmptyId);
        }
        if let Some(c) = id.chars().find(|c| *c == ':' || !c.is_ascii_graphic()) {
            return Err(CredentialError::InvalidId(c));
        }

        let secret = secret.as_ref().to_vec();
        if secret.is_empty() {
            return Err(CredentialError::EmptySecret);
        }

        Ok(Self { id, secret })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub(crate) fn secret(&self) -> &[u8] {
        &self.secret
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("id", &self.id)
            .field("secret", &"<redacted>")
            .finish()
    }
}
