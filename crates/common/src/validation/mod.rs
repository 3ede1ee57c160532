//! Field-level validation used by the CRM, inventory and admin services.
//!
//! Validators are small reusable checks ([`FieldValidator`]); [`Validator`]
//! runs several of them and collects every failure into one
//! [`ValidationError`].

use std::fmt;

mod validators;

pub use validators::{
    DocumentNumberValidator, EmailValidator, FieldValidator, RangeValidator, StringValidator,
};

/// Type alias for validation results
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validation error with detailed field-level errors
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationError {
    pub errors: Vec<FieldError>,
}

impl ValidationError {
    /// Create a new validation error
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    /// Create with a single field error
    pub fn field(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut err = Self::new();
        err.add_field_error(field, message);
        err
    }

    /// Add a field-level error
    pub fn add_field_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError { field: field.into(), message: message.into() });
    }

    /// Check if there are any errors
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Get errors for a specific field
    pub fn field_errors(&self, field: &str) -> Vec<&FieldError> {
        self.errors.iter().filter(|e| e.field == field).collect()
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.errors.as_slice() {
            [] => write!(f, "Validation error with no specific field errors"),
            [single] => write!(f, "Validation failed: {}: {}", single.field, single.message),
            many => {
                write!(f, "Validation failed with {} errors: ", many.len())?;
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

/// Collects field checks and reports them together
///
/// ```
/// use printshop_common::validation::{EmailValidator, StringValidator, Validator};
///
/// let result = Validator::new()
///     .check("name", &"Imprenta Sur", &StringValidator::new().not_empty())
///     .check("email", &"not-an-email", &EmailValidator::new())
///     .finish();
/// assert_eq!(result.unwrap_err().errors.len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct Validator {
    error: ValidationError,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `validator` against `value`, recording a failure under `field`
    pub fn check<T, V>(mut self, field: &str, value: &T, validator: &V) -> Self
    where
        V: FieldValidator<T>,
    {
        if let Err(message) = validator.validate(value) {
            self.error.add_field_error(field, message);
        }
        self
    }

    /// Like [`Self::check`], skipping `None`
    pub fn check_optional<T, V>(self, field: &str, value: Option<&T>, validator: &V) -> Self
    where
        V: FieldValidator<T>,
    {
        match value {
            Some(value) => self.check(field, value, validator),
            None => self,
        }
    }

    pub fn finish(self) -> ValidationResult<()> {
        if self.error.is_empty() {
            Ok(())
        } else {
            Err(self.error)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_single_error_names_field() {
        let err = ValidationError::field("email", "Invalid email format");
        assert_eq!(err.to_string(), "Validation failed: email: Invalid email format");
    }

    #[test]
    fn display_multiple_errors_counts_them() {
        let mut err = ValidationError::new();
        err.add_field_error("sku", "Value cannot be empty");
        err.add_field_error("stock", "Value must be at least 0");
        assert!(err.to_string().starts_with("Validation failed with 2 errors"));
        assert_eq!(err.field_errors("sku").len(), 1);
    }

    #[test]
    fn validator_passes_when_every_check_passes() {
        let result = Validator::new()
            .check("name", &"Acme", &StringValidator::new().not_empty())
            .check_optional("email", None::<&&str>, &EmailValidator::new())
            .finish();
        assert!(result.is_ok());
    }
}
