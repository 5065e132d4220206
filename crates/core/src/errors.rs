//! Bridges shared-library errors into [`AdminError`].

use duoadmin_common::{CommonError, ValidationError};
use duoadmin_domain::AdminError;

/// Convert a [`ValidationError`] into [`AdminError::Validation`].
pub fn validation_failed(err: ValidationError) -> AdminError {
    AdminError::Validation(err.to_string())
}

/// Convert a [`CommonError`] (crypto, keychain, io) into [`AdminError::Security`].
pub fn security_failed(err: CommonError) -> AdminError {
    AdminError::Security(err.to_string())
}

/// `?`-friendly conversion for validation results.
pub trait ValidationResultExt<T> {
    fn or_invalid(self) -> Result<T, AdminError>;
}

impl<T> ValidationResultExt<T> for Result<T, ValidationError> {
    fn or_invalid(self) -> Result<T, AdminError> {
        self.map_err(validation_failed)
    }
}
