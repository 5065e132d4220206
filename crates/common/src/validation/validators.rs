// Field Validators - reusable checks for request inputs
use once_cell::sync::Lazy;
use regex::Regex;

use super::{ValidationError, ValidationResult};

/// Trait for field validators
pub trait FieldValidator<T: ?Sized> {
    /// Validate a field value, returning a human-readable reason on failure
    fn validate(&self, value: &T) -> Result<(), String>;
}

/// String validator with length constraints
#[derive(Debug, Clone)]
pub struct StringValidator {
    min_length: Option<usize>,
    max_length: Option<usize>,
    not_empty: bool,
    trim: bool,
}

impl Default for StringValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl StringValidator {
    pub fn new() -> Self {
        Self { min_length: None, max_length: None, not_empty: false, trim: true }
    }

    /// Require a non-empty string
    pub fn not_empty(mut self) -> Self {
        self.not_empty = true;
        self
    }

    /// Minimum length in characters
    pub fn min_length(mut self, min: usize) -> Self {
        self.min_length = Some(min);
        self
    }

    /// Maximum length in characters
    pub fn max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }

    /// Whether surrounding whitespace is ignored (default: true)
    pub fn trim(mut self, trim: bool) -> Self {
        self.trim = trim;
        self
    }
}

impl FieldValidator<str> for StringValidator {
    fn validate(&self, value: &str) -> Result<(), String> {
        let val = if self.trim { value.trim() } else { value };
        let len = val.chars().count();

        if self.not_empty && val.is_empty() {
            return Err("Value cannot be empty".to_string());
        }

        if let Some(min) = self.min_length {
            if len < min {
                return Err(format!("Length must be at least {min} characters"));
            }
        }

        if let Some(max) = self.max_length {
            if len > max {
                return Err(format!("Length must not exceed {max} characters"));
            }
        }

        Ok(())
    }
}

static EMAIL_REGEX: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9._%+'-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").ok());

/// Email address validator
#[derive(Debug, Clone, Copy, Default)]
pub struct EmailValidator;

impl FieldValidator<str> for EmailValidator {
    fn validate(&self, value: &str) -> Result<(), String> {
        match EMAIL_REGEX.as_ref() {
            Some(re) if re.is_match(value.trim()) => Ok(()),
            _ => Err("Invalid email format".to_string()),
        }
    }
}

static HOST_REGEX: Lazy<Option<Regex>> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9]([A-Za-z0-9-]{0,61}[A-Za-z0-9])?(\.[A-Za-z0-9]([A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+$")
        .ok()
});

/// Bare DNS host name validator: no scheme, port, path or query.
#[derive(Debug, Clone, Copy, Default)]
pub struct HostValidator;

impl FieldValidator<str> for HostValidator {
    fn validate(&self, value: &str) -> Result<(), String> {
        let value = value.trim();
        if value.contains("://") {
            return Err("Host must not include a scheme".to_string());
        }
        if value.contains(['/', '?', '#', ':', '@']) {
            return Err("Host must not include a port, path, or query".to_string());
        }
        match HOST_REGEX.as_ref() {
            Some(re) if re.is_match(value) => Ok(()),
            _ => Err(format!("'{value}' is not a valid host name")),
        }
    }
}

fn run<'a, V: FieldValidator<str>>(
    validator: &V,
    field: &str,
    value: &'a str,
) -> ValidationResult<&'a str> {
    validator
        .validate(value)
        .map(|()| value.trim())
        .map_err(|message| ValidationError::field(field, message))
}

/// Reject empty or whitespace-only values; returns the trimmed value.
pub fn require_non_empty<'a>(field: &str, value: &'a str) -> ValidationResult<&'a str> {
    run(&StringValidator::new().not_empty(), field, value)
}

/// Accept a bare API host name such as `api-1234abcd.duosecurity.com`.
pub fn validate_api_host<'a>(field: &str, value: &'a str) -> ValidationResult<&'a str> {
    run(&HostValidator, field, value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_validator_trims_before_checking() {
        let v = StringValidator::new().not_empty();
        assert!(v.validate("   ").is_err());
        assert!(v.validate(" x ").is_ok());
        assert!(StringValidator::new().not_empty().trim(false).validate("   ").is_ok());
    }

    #[test]
    fn string_validator_counts_characters_not_bytes() {
        let v = StringValidator::new().max_length(4);
        assert!(v.validate("ÅÄÖÜ").is_ok());
        assert!(v.validate("ÅÄÖÜX").is_err());
    }

    #[test]
    fn require_non_empty_returns_trimmed_value() {
        assert_eq!(require_non_empty("username", "  jdoe ").unwrap(), "jdoe");
        let err = require_non_empty("username", "").unwrap_err();
        assert_eq!(err.errors[0].field, "username");
    }

    #[test]
    fn email_validation() {
        assert!(EmailValidator.validate("jane.doe+admin@example.com").is_ok());
        assert!(EmailValidator.validate(" o'brien@example.co.uk ").is_ok());
        assert!(EmailValidator.validate("jane@").is_err());
        assert!(EmailValidator.validate("plain").is_err());
    }

    #[test]
    fn api_host_must_be_bare() {
        assert!(validate_api_host("api_host", "api-1234.example.com").is_ok());
        assert!(validate_api_host("api_host", "https://api-1234.example.com").is_err());
        assert!(validate_api_host("api_host", "api-1234.example.com/admin").is_err());
        assert!(validate_api_host("api_host", "api-1234.example.com:443").is_err());
        assert!(validate_api_host("api_host", "localhost").is_err());
        assert!(validate_api_host("api_host", "").is_err());
    }
}
