use std::collections::BTreeMap;
use std::sync::Arc;

use duoadmin_common::SecureString;
use duoadmin_domain::{AdminError, Result};
use parking_lot::RwLock;
use tracing::{debug, info, warn};

use super::{CredentialVault, Credentials};

/// Process-wide holder of the active [`Credentials`].
///
/// Readers get an `Arc` snapshot, so a concurrent replacement never exposes a
/// half-written set. Mutations take the write lock and are serialized.
#[derive(Debug, Default)]
pub struct CredentialStore {
    active: RwLock<Option<Arc<Credentials>>>,
}

impl CredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store that is already configured.
    pub fn with_credentials(credentials: Credentials) -> Self {
        Self { active: RwLock::new(Some(Arc::new(credentials))) }
    }

    /// Validate and install a credential set, replacing any previous one.
    pub fn initialize(
        &self,
        integration_key: &str,
        secret_key: SecureString,
        api_host: &str,
        auxiliary_keys: Option<BTreeMap<String, SecureString>>,
    ) -> Result<Arc<Credentials>> {
        let mut credentials = Credentials::new(integration_key, secret_key, api_host)?;
        if let Some(keys) = auxiliary_keys {
            credentials = credentials.with_auxiliary_keys(keys)?;
        }
        Ok(self.replace(credentials))
    }

    /// Install an already validated credential set.
    pub fn replace(&self, credentials: Credentials) -> Arc<Credentials> {
        let credentials = Arc::new(credentials);
        let previous = self.active.write().replace(Arc::clone(&credentials));
        info!(
            integration_key = %credentials.integration_key(),
            api_host = %credentials.api_host(),
            replaced = previous.is_some(),
            "credentials installed"
        );
        credentials
    }

    /// Snapshot of the active credentials.
    pub fn get(&self) -> Result<Arc<Credentials>> {
        match self.active.read().as_ref() {
            Some(credentials) => Ok(Arc::clone(credentials)),
            None => {
                warn!("credentials requested before initialization");
                Err(AdminError::NotConfigured)
            }
        }
    }

    pub fn is_configured(&self) -> bool {
        self.active.read().is_some()
    }

    /// Add or replace a named auxiliary key on the active set.
    pub fn add_auxiliary_key(&self, name: &str, value: SecureString) -> Result<()> {
        let mut guard = self.active.write();
        let current = guard.as_ref().ok_or(AdminError::NotConfigured)?;

        let mut updated = Credentials::clone(current);
        updated.insert_auxiliary_key(name, value)?;
        *guard = Some(Arc::new(updated));

        debug!(name = name.trim(), "auxiliary key stored");
        Ok(())
    }

    /// Drop the active credentials. Later calls to [`get`](Self::get) fail.
    pub fn clear(&self) {
        if self.active.write().take().is_some() {
            info!("credentials cleared");
        }
    }

    /// Write the active set through `vault`.
    pub fn persist(&self, vault: &dyn CredentialVault) -> Result<()> {
        let credentials = self.get()?;
        vault.persist(&credentials)
    }

    /// Read a set from `vault` and make it active.
    pub fn load(&self, vault: &dyn CredentialVault) -> Result<Arc<Credentials>> {
        let credentials = vault.load()?;
        Ok(self.replace(credentials))
    }
}
