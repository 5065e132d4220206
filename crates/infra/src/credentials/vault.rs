//! AES-256-GCM credential file.
//!
//! The file holds one base64 JSON container produced by
//! [`EncryptionService`]. Which key opens it depends on the [`KeySource`]:
//! a random key kept in the OS keychain (the file is then only readable by
//! the same OS user), an Argon2-stretched passphrase, or a caller-supplied
//! hex key.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use duoadmin_common::{EncryptedData, EncryptionService, KeychainError, KeychainProvider, SecureString};
use duoadmin_core::{security_failed, CredentialVault, Credentials};
use duoadmin_domain::{AdminError, Result};
use tracing::{debug, info};
use zeroize::Zeroizing;

use super::CredentialDocument;
use crate::errors::vault_io_failure;

pub const DEFAULT_KEYCHAIN_SERVICE: &str = "duoadmin";
pub const DEFAULT_KEYCHAIN_ACCOUNT: &str = "credential-file-key";

/// Where the file encryption key comes from.
#[derive(Debug, Clone)]
pub enum KeySource {
    /// Random key stored in the platform keychain, created on first persist.
    Keychain { service: String, account: String },
    /// Key derived from a passphrase with Argon2; the salt is stored in the file.
    Passphrase(SecureString),
    /// Hex-encoded 32-byte key.
    Direct(SecureString),
}

impl Default for KeySource {
    fn default() -> Self {
        Self::Keychain {
            service: DEFAULT_KEYCHAIN_SERVICE.to_string(),
            account: DEFAULT_KEYCHAIN_ACCOUNT.to_string(),
        }
    }
}

impl KeySource {
    fn sealing_cipher(&self) -> Result<EncryptionService> {
        match self {
            Self::Keychain { service, account } => {
                let keychain = KeychainProvider::new(service.as_str());
                keychain.get_or_create_key(account).map_err(|e| security_failed(e.into()))?;
                // Seal only with a key a fresh entry can read back, so the file stays openable.
                let key = read_keychain_key(&keychain, service, account)?;
                EncryptionService::from_hex_key(&key).map_err(security_failed)
            }
            Self::Passphrase(passphrase) => {
                EncryptionService::from_password(passphrase).map_err(security_failed)
            }
            Self::Direct(key) => EncryptionService::from_hex_key(key).map_err(security_failed),
        }
    }

    fn opening_cipher(&self, container: &EncryptedData) -> Result<EncryptionService> {
        match self {
            Self::Keychain { service, account } => {
                let key =
                    read_keychain_key(&KeychainProvider::new(service.as_str()), service, account)?;
                EncryptionService::from_hex_key(&key).map_err(security_failed)
            }
            Self::Passphrase(passphrase) => {
                let salt = container.salt.as_deref().ok_or_else(|| {
                    AdminError::Security("credential file was not sealed with a passphrase".to_string())
                })?;
                EncryptionService::from_password_with_salt(passphrase, Some(salt))
                    .map_err(security_failed)
            }
            Self::Direct(key) => EncryptionService::from_hex_key(key).map_err(security_failed),
        }
    }
}

fn read_keychain_key(keychain: &KeychainProvider, service: &str, account: &str) -> Result<SecureString> {
    keychain.get_secret(account).map_err(|e| match e {
        KeychainError::NotFound => AdminError::Security(format!(
            "no key for credential file in keychain ({service}/{account})"
        )),
        other => security_failed(other.into()),
    })
}

/// [`CredentialVault`] backed by an encrypted file.
#[derive(Debug, Clone)]
pub struct EncryptedFileVault {
    path: PathBuf,
    key_source: KeySource,
}

impl EncryptedFileVault {
    pub fn new(path: impl Into<PathBuf>, key_source: KeySource) -> Self {
        Self { path: path.into(), key_source }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }
}

impl CredentialVault for EncryptedFileVault {
    fn persist(&self, credentials: &Credentials) -> Result<()> {
        let document = CredentialDocument::from_credentials(credentials);
        let plaintext = Zeroizing::new(serde_json::to_vec(&document).map_err(|e| {
            AdminError::Security(format!("cannot serialize credentials: {e}"))
        })?);

        let sealed = self.key_source.sealing_cipher()?.encrypt_to_string(&plaintext).map_err(security_failed)?;
        write_private(&self.path, sealed.as_bytes())?;

        info!(path = %self.path.display(), "credentials persisted");
        Ok(())
    }

    fn load(&self) -> Result<Credentials> {
        let encoded = fs::read_to_string(&self.path).map_err(|e| {
            vault_io_failure(&format!("cannot read credential file {}", self.path.display()), e)
        })?;

        let container = EncryptionService::decode_container(&encoded).map_err(security_failed)?;
        let plaintext = Zeroizing::new(
            self.key_source.opening_cipher(&container)?.decrypt(&container).map_err(security_failed)?,
        );
        let document: CredentialDocument = serde_json::from_slice(&plaintext)
            .map_err(|e| AdminError::Security(format!("credential file is corrupt: {e}")))?;

        debug!(path = %self.path.display(), version = document.version, "credential file decrypted");
        document.into_credentials()
    }
}

/// Write through a sibling temp file and rename, leaving the file `0o600` on Unix.
fn write_private(path: &Path, contents: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|e| vault_io_failure("cannot create credential directory", e))?;
    }

    let temp_path = path.with_extension("tmp");
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file =
        options.open(&temp_path).map_err(|e| vault_io_failure("cannot create temp file", e))?;
    file.write_all(contents).map_err(|e| vault_io_failure("cannot write temp file", e))?;
    file.sync_all().map_err(|e| vault_io_failure("cannot flush temp file", e))?;
    drop(file);

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&temp_path, fs::Permissions::from_mode(0o600))
            .map_err(|e| vault_io_failure("cannot restrict temp file permissions", e))?;
    }

    fs::rename(&temp_path, path).map_err(|e| vault_io_failure("cannot replace credential file", e))
}
