// Validation Module - pure input checks run before a request is built
use std::fmt;

mod validators;

pub use validators::{
    require_non_empty, validate_api_host, EmailValidator, FieldValidator, HostValidator,
    StringValidator,
};

/// Type alias for validation results
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validation error with field-level detail
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationError {
    pub errors: Vec<FieldError>,
}

impl ValidationError {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with a single field error
    pub fn field(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut err = Self::new();
        err.add_field_error(field, message);
        err
    }

    pub fn add_field_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError::new(field, message));
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// Errors recorded against one field
    pub fn field_errors(&self, field: &str) -> Vec<&FieldError> {
        self.errors.iter().filter(|e| e.field == field).collect()
    }

    pub fn merge(&mut self, other: ValidationError) {
        self.errors.extend(other.errors);
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.errors.as_slice() {
            [] => write!(f, "Validation error with no specific field errors"),
            [only] => write!(f, "{}: {}", only.field, only.message),
            many => {
                write!(f, "{} errors: ", many.len())?;
                for (i, error) in many.iter().enumerate() {
                    if i > 0 {
                        write!(f, "; ")?;
                    }
                    write!(f, "{}: {}", error.field, error.message)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Individual field error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field: field.into(), message: message.into() }
    }
}

/// Collects field errors across several checks and reports them together
///
/// ```rust
/// use duoadmin_common::validation::{StringValidator, Validator};
///
/// let result = Validator::new()
///     .check("username", &StringValidator::new().not_empty(), "jdoe")
///     .check("realname", &StringValidator::new().max_length(4), "Jane Doe")
///     .finish();
/// assert_eq!(result.unwrap_err().error_count(), 1);
/// ```
#[derive(Debug, Default)]
pub struct Validator {
    errors: ValidationError,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn check<T: ?Sized, V: FieldValidator<T> + ?Sized>(
        mut self,
        field: &str,
        validator: &V,
        value: &T,
    ) -> Self {
        if let Err(message) = validator.validate(value) {
            self.errors.add_field_error(field, message);
        }
        self
    }

    /// Run `validator` only when a value is present.
    #[must_use]
    pub fn check_opt<T: ?Sized, V: FieldValidator<T> + ?Sized>(
        self,
        field: &str,
        validator: &V,
        value: Option<&T>,
    ) -> Self {
        match value {
            Some(value) => self.check(field, validator, value),
            None => self,
        }
    }

    pub fn finish(self) -> ValidationResult<()> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_every_failing_field() {
        let err = Validator::new()
            .check("username", &StringValidator::new().not_empty(), "")
            .check("email", &EmailValidator, "not-an-email")
            .check("realname", &StringValidator::new().not_empty(), "Jane")
            .finish()
            .unwrap_err();

        assert_eq!(err.error_count(), 2);
        assert_eq!(err.field_errors("email").len(), 1);
        assert!(err.to_string().starts_with("2 errors: "));
    }

    #[test]
    fn optional_fields_are_skipped_when_absent() {
        let result = Validator::new().check_opt("email", &EmailValidator, None::<&str>).finish();
        assert!(result.is_ok());
    }

    #[test]
    fn single_error_display_names_the_field() {
        let err = ValidationError::field("user_id", "Value cannot be empty");
        assert_eq!(err.to_string(), "user_id: Value cannot be empty");
    }

    #[test]
    fn merge_combines_errors() {
        let mut a = ValidationError::field("a", "bad");
        a.merge(ValidationError::field("b", "worse"));
        assert_eq!(a.error_count(), 2);
    }
}
