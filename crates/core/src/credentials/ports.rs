use duoadmin_domain::Result;

use super::Credentials;

/// Persistence boundary for a [`Credentials`] set.
///
/// Implementations must encrypt at rest; the file layout belongs to the
/// implementation.
pub trait CredentialVault: Send + Sync {
    fn persist(&self, credentials: &Credentials) -> Result<()>;

    fn load(&self) -> Result<Credentials>;
}
