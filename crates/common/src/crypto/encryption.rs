//! AES-256-GCM encryption for data at rest.
//!
//! - [`EncryptionService`]: encrypt/decrypt with a raw 256-bit key, a
//!   hex-encoded key (as kept in the OS keychain), or a passphrase stretched
//!   with Argon2
//! - [`EncryptedData`]: serializable ciphertext container
//!
//! ```rust
//! use duoadmin_common::crypto::EncryptionService;
//!
//! let service = EncryptionService::new(&EncryptionService::generate_key())?;
//! let sealed = service.encrypt_to_string(b"sensitive data")?;
//! assert_eq!(service.decrypt_from_string(&sealed)?, b"sensitive data");
//! # Ok::<(), duoadmin_common::error::CommonError>(())
//! ```

use aes_gcm::aead::{Aead, AeadCore, KeyInit, OsRng};
use aes_gcm::{Aes256Gcm, Nonce};
use argon2::password_hash::SaltString;
use argon2::Argon2;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::error::{CommonError, CommonResult};
use crate::security::SecureString;

const ALGORITHM: &str = "AES-256-GCM";
const KEY_LEN: usize = 32;
const NONCE_LEN: usize = 12;

/// Encrypted payload plus what is needed to decrypt it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedData {
    pub nonce: Vec<u8>,
    pub ciphertext: Vec<u8>,
    /// Argon2 salt when the key was derived from a passphrase.
    pub salt: Option<String>,
    pub algorithm: String,
}

/// AES-256-GCM cipher with an optional passphrase-derived key.
pub struct EncryptionService {
    cipher: Aes256Gcm,
    password_salt: Option<String>,
}

impl std::fmt::Debug for EncryptionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncryptionService")
            .field("key", &"[REDACTED]")
            .field("password_salt", &self.password_salt.is_some())
            .finish()
    }
}

impl EncryptionService {
    /// Create a service from a raw 32-byte key.
    pub fn new(key: &[u8]) -> CommonResult<Self> {
        if key.len() != KEY_LEN {
            return Err(CommonError::crypto(format!(
                "Encryption key must be exactly {KEY_LEN} bytes, got {}",
                key.len()
            )));
        }

        let cipher = Aes256Gcm::new_from_slice(key)
            .map_err(|e| CommonError::crypto(format!("Failed to create cipher: {e}")))?;

        Ok(Self { cipher, password_salt: None })
    }

    /// Create a service from a hex-encoded 32-byte key.
    pub fn from_hex_key(key: &SecureString) -> CommonResult<Self> {
        let raw = Zeroizing::new(
            hex::decode(key.expose())
                .map_err(|e| CommonError::crypto(format!("Encryption key is not valid hex: {e}")))?,
        );
        Self::new(&raw)
    }

    /// Derive the key from a passphrase with a fresh random salt.
    pub fn from_password(password: &SecureString) -> CommonResult<Self> {
        Self::from_password_with_salt(password, None)
    }

    /// Derive the key from a passphrase, reusing `salt` when decrypting data
    /// sealed earlier.
    pub fn from_password_with_salt(
        password: &SecureString,
        salt: Option<&str>,
    ) -> CommonResult<Self> {
        let salt = match salt {
            Some(existing) => SaltString::from_b64(existing)
                .map_err(|e| CommonError::KeyDerivation(format!("Invalid password salt: {e}")))?,
            None => SaltString::generate(&mut OsRng),
        };

        let mut key = Zeroizing::new([0u8; KEY_LEN]);
        Argon2::default()
            .hash_password_into(password.expose_bytes(), salt.as_str().as_bytes(), &mut key[..])
            .map_err(|e| CommonError::KeyDerivation(format!("Key derivation failed: {e}")))?;

        let mut service = Self::new(&key[..])?;
        service.password_salt = Some(salt.as_str().to_string());
        Ok(service)
    }

    /// Generate a random 32-byte key.
    pub fn generate_key() -> Vec<u8> {
        Aes256Gcm::generate_key(&mut OsRng).to_vec()
    }

    /// Argon2 salt, when the key was derived from a passphrase.
    pub fn salt(&self) -> Option<&str> {
        self.password_salt.as_deref()
    }

    pub fn encrypt(&self, data: &[u8]) -> CommonResult<EncryptedData> {
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let ciphertext = self
            .cipher
            .encrypt(&nonce, data)
            .map_err(|e| CommonError::crypto(format!("Encryption failed: {e}")))?;

        Ok(EncryptedData {
            nonce: nonce.to_vec(),
            ciphertext,
            salt: self.password_salt.clone(),
            algorithm: ALGORITHM.to_string(),
        })
    }

    pub fn decrypt(&self, encrypted: &EncryptedData) -> CommonResult<Vec<u8>> {
        if encrypted.algorithm != ALGORITHM {
            return Err(CommonError::crypto(format!(
                "Unsupported algorithm: {}",
                encrypted.algorithm
            )));
        }

        if encrypted.nonce.len() != NONCE_LEN {
            return Err(CommonError::crypto(format!(
                "Nonce must be exactly {NONCE_LEN} bytes for {ALGORITHM}"
            )));
        }

        self.cipher
            .decrypt(Nonce::from_slice(&encrypted.nonce), encrypted.ciphertext.as_ref())
            .map_err(|_| {
                CommonError::crypto("Decryption failed: wrong key or tampered ciphertext")
            })
    }

    /// Encrypt and encode the container as base64 JSON.
    pub fn encrypt_to_string(&self, data: &[u8]) -> CommonResult<String> {
        let encrypted = self.encrypt(data)?;
        let serialized = serde_json::to_vec(&encrypted)?;
        Ok(BASE64.encode(serialized))
    }

    /// Decode a container produced by [`Self::encrypt_to_string`] and decrypt it.
    pub fn decrypt_from_string(&self, encoded: &str) -> CommonResult<Vec<u8>> {
        self.decrypt(&Self::decode_container(encoded)?)
    }

    /// Decode a container without decrypting it, e.g. to read its salt.
    pub fn decode_container(encoded: &str) -> CommonResult<EncryptedData> {
        let decoded = BASE64
            .decode(encoded.trim())
            .map_err(|e| CommonError::serialization(format!("Base64 decode failed: {e}")))?;
        Ok(serde_json::from_slice(&decoded)?)
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for crypto::encryption.
    use super::*;

    #[test]
    fn generate_key_has_correct_length() {
        assert_eq!(EncryptionService::generate_key().len(), 32);
    }

    #[test]
    fn new_service_rejects_invalid_key_size() {
        assert!(EncryptionService::new(&[0; 16]).is_err());
    }

    #[test]
    fn encrypt_and_decrypt_round_trip() {
        let service = EncryptionService::new(&EncryptionService::generate_key()).unwrap();

        let encrypted = service.encrypt(b"hello world").unwrap();
        assert_ne!(encrypted.ciphertext, b"hello world");
        assert_eq!(service.decrypt(&encrypted).unwrap(), b"hello world");
    }

    #[test]
    fn hex_key_matches_raw_key() {
        let raw = EncryptionService::generate_key();
        let from_raw = EncryptionService::new(&raw).unwrap();
        let from_hex = EncryptionService::from_hex_key(&SecureString::new(hex::encode(&raw))).unwrap();

        let sealed = from_raw.encrypt_to_string(b"payload").unwrap();
        assert_eq!(from_hex.decrypt_from_string(&sealed).unwrap(), b"payload");
    }

    #[test]
    fn wrong_key_fails_to_decrypt() {
        let a = EncryptionService::new(&EncryptionService::generate_key()).unwrap();
        let b = EncryptionService::new(&EncryptionService::generate_key()).unwrap();

        let sealed = a.encrypt(b"secret").unwrap();
        assert!(matches!(b.decrypt(&sealed), Err(CommonError::Crypto(_))));
    }

    #[test]
    fn password_key_is_reproducible_from_salt() {
        let password = SecureString::from("correct horse battery staple");
        let sealing = EncryptionService::from_password(&password).unwrap();
        let sealed = sealing.encrypt_to_string(b"creds").unwrap();

        let container = EncryptionService::decode_container(&sealed).unwrap();
        let salt = container.salt.as_deref().unwrap();
        let opening = EncryptionService::from_password_with_salt(&password, Some(salt)).unwrap();

        assert_eq!(opening.decrypt(&container).unwrap(), b"creds");
    }

    #[test]
    fn rejects_unknown_algorithm() {
        let service = EncryptionService::new(&EncryptionService::generate_key()).unwrap();
        let mut sealed = service.encrypt(b"x").unwrap();
        sealed.algorithm = "ROT13".to_string();
        assert!(service.decrypt(&sealed).is_err());
    }
}
