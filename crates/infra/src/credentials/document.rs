use std::collections::BTreeMap;

use duoadmin_common::SecureString;
use duoadmin_core::Credentials;
use duoadmin_domain::{AdminError, Result};
use serde::{Deserialize, Serialize};

/// Plaintext layout of a credential file before encryption.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialDocument {
    pub version: u32,
    pub integration_key: String,
    pub secret_key: SecureString,
    pub api_host: String,
    #[serde(default)]
    pub auxiliary_keys: BTreeMap<String, SecureString>,
}

impl CredentialDocument {
    pub const CURRENT_VERSION: u32 = 1;

    pub fn from_credentials(credentials: &Credentials) -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            integration_key: credentials.integration_key().to_string(),
            secret_key: credentials.secret_key().clone(),
            api_host: credentials.api_host().to_string(),
            auxiliary_keys: credentials.auxiliary_keys().clone(),
        }
    }

    /// Re-validate and convert. Unknown versions are refused.
    pub fn into_credentials(self) -> Result<Credentials> {
        if self.version != Self::CURRENT_VERSION {
            return Err(AdminError::Security(format!(
                "unsupported credential file version {} (expected {})",
                self.version,
                Self::CURRENT_VERSION
            )));
        }

        Credentials::new(&self.integration_key, self.secret_key, &self.api_host)?
            .with_auxiliary_keys(self.auxiliary_keys)
    }
}
