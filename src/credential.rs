//! Session-scoped credential handling.
//!
//! The API key lives for one session only: it is entered once, held in a
//! single named slot, and dropped on explicit reset.

use crate::errors::CredentialError;
use std::collections::HashMap;
use std::fmt;

/// Name of the slot the API key is stored under.
pub const CREDENTIAL_SLOT: &str = "gemini-api-key";

/// A non-empty API key.
///
/// The only validation is that the trimmed key is not empty. `Debug`
/// redacts the secret so it never lands in logs.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(key: impl AsRef<str>) -> Result<Self, CredentialError> {
        let key = key.as_ref().trim();
        if key.is_empty() {
            return Err(CredentialError::Empty);
        }
        Ok(Self(key.to_string()))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Credential").field(&"<redacted>").finish()
    }
}

/// In-memory key-value storage scoped to the current session.
#[derive(Debug, Default)]
pub struct CredentialStore {
    slots: HashMap<&'static str, Credential>,
}

impl CredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The stored key, if one was entered this session.
    pub fn load(&self) -> Option<Credential> {
        self.slots.get(CREDENTIAL_SLOT).cloned()
    }

    pub fn store(&mut self, credential: Credential) {
        self.slots.insert(CREDENTIAL_SLOT, credential);
    }

    pub fn clear(&mut self) {
        self.slots.remove(CREDENTIAL_SLOT);
    }
}
