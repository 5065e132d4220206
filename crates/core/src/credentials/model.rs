use std::collections::BTreeMap;
use std::fmt;

use duoadmin_common::validation::{require_non_empty, validate_api_host};
use duoadmin_common::SecureString;
use duoadmin_domain::Result;

use crate::errors::ValidationResultExt;

/// Integration key, secret key and API host for one Admin API integration,
/// plus any named auxiliary secrets.
///
/// Only [`Credentials::new`] builds one, so every instance has passed
/// validation. There is no serde support; persisted sets are rehydrated
/// through the vault, which validates again.
///
/// ```compile_fail
/// fn deserializable<T: serde::de::DeserializeOwned>() {}
/// deserializable::<duoadmin_core::Credentials>();
/// ```
///
/// ```compile_fail
/// fn serializable<T: serde::Serialize>() {}
/// serializable::<duoadmin_core::Credentials>();
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    integration_key: String,
    secret_key: SecureString,
    api_host: String,
    auxiliary_keys: BTreeMap<String, SecureString>,
}

impl Credentials {
    /// Validate and normalize a credential set.
    ///
    /// Keys are trimmed, the host is trimmed and lowercased and must be a
    /// bare hostname without scheme, port or path.
    pub fn new(
        integration_key: impl AsRef<str>,
        secret_key: SecureString,
        api_host: impl AsRef<str>,
    ) -> Result<Self> {
        let integration_key = require_non_empty("integration_key", integration_key.as_ref()).or_invalid()?;
        let secret = require_non_empty("secret_key", secret_key.expose()).or_invalid()?;
        let api_host = validate_api_host("api_host", api_host.as_ref()).or_invalid()?;

        Ok(Self {
            integration_key: integration_key.to_string(),
            secret_key: SecureString::new(secret),
            api_host: api_host.to_lowercase(),
            auxiliary_keys: BTreeMap::new(),
        })
    }

    /// Add several auxiliary keys under the same rules as
    /// [`insert_auxiliary_key`](Self::insert_auxiliary_key).
    pub fn with_auxiliary_keys(mut self, keys: BTreeMap<String, SecureString>) -> Result<Self> {
        for (name, value) in keys {
            self.insert_auxiliary_key(&name, value)?;
        }
        Ok(self)
    }

    /// Insert or replace an auxiliary key. Names are trimmed and must be non-empty.
    pub fn insert_auxiliary_key(&mut self, name: &str, value: SecureString) -> Result<()> {
        let name = require_non_empty("auxiliary_key_name", name).or_invalid()?;
        self.auxiliary_keys.insert(name.to_string(), value);
        Ok(())
    }

    pub fn integration_key(&self) -> &str {
        &self.integration_key
    }

    pub fn secret_key(&self) -> &SecureString {
        &self.secret_key
    }

    pub fn api_host(&self) -> &str {
        &self.api_host
    }

    pub fn auxiliary_key(&self, name: &str) -> Option<&SecureString> {
        self.auxiliary_keys.get(name)
    }

    pub fn auxiliary_keys(&self) -> &BTreeMap<String, SecureString> {
        &self.auxiliary_keys
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("integration_key", &self.integration_key)
            .field("secret_key", &self.secret_key)
            .field("api_host", &self.api_host)
            .field("auxiliary_keys", &self.auxiliary_keys.keys().collect::<Vec<_>>())
            .finish()
    }
}
