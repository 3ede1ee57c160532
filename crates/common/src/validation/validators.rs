//! Reusable field validators

use std::fmt::Display;

use once_cell::sync::Lazy;
use regex::Regex;

/// Trait for field validators
pub trait FieldValidator<T: ?Sized> {
    /// Validate a field value
    fn validate(&self, value: &T) -> Result<(), String>;
}

/// Range validator for numeric types
#[derive(Debug, Clone)]
pub struct RangeValidator<T> {
    min: Option<T>,
    max: Option<T>,
}

impl<T> Default for RangeValidator<T> {
    fn default() -> Self {
        Self { min: None, max: None }
    }
}

impl<T> RangeValidator<T>
where
    T: PartialOrd + Display,
{
    /// Create a new range validator with no constraints
    pub fn empty() -> Self {
        Self::default()
    }

    /// Set minimum value
    pub fn min(mut self, min: T) -> Self {
        self.min = Some(min);
        self
    }

    /// Set maximum value
    pub fn max(mut self, max: T) -> Self {
        self.max = Some(max);
        self
    }
}

impl<T> FieldValidator<T> for RangeValidator<T>
where
    T: PartialOrd + Display,
{
    fn validate(&self, value: &T) -> Result<(), String> {
        if let Some(ref min) = self.min {
            if value < min {
                return Err(format!("Value must be at least {}", min));
            }
        }

        if let Some(ref max) = self.max {
            if value > max {
                return Err(format!("Value must not exceed {}", max));
            }
        }

        Ok(())
    }
}

/// String validator with length and emptiness constraints
#[derive(Debug, Clone, Default)]
pub struct StringValidator {
    max_length: Option<usize>,
    not_empty: bool,
}

impl StringValidator {
    /// Create a new string validator
    pub fn new() -> Self {
        Self::default()
    }

    /// Require a non-blank string
    pub fn not_empty(mut self) -> Self {
        self.not_empty = true;
        self
    }

    /// Set maximum length in characters
    pub fn max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }
}

impl FieldValidator<str> for StringValidator {
    fn validate(&self, value: &str) -> Result<(), String> {
        let val = value.trim();

        if self.not_empty && val.is_empty() {
            return Err("Value cannot be empty".to_string());
        }

        if let Some(max) = self.max_length {
            if val.chars().count() > max {
                return Err(format!("Length must not exceed {} characters", max));
            }
        }

        Ok(())
    }
}

impl FieldValidator<String> for StringValidator {
    fn validate(&self, value: &String) -> Result<(), String> {
        FieldValidator::<str>::validate(self, value.as_str())
    }
}

impl FieldValidator<&str> for StringValidator {
    fn validate(&self, value: &&str) -> Result<(), String> {
        FieldValidator::<str>::validate(self, value)
    }
}

static EMAIL_REGEX: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").ok());

/// Email validator
#[derive(Debug, Clone, Default)]
pub struct EmailValidator;

impl EmailValidator {
    /// Create a new email validator
    pub fn new() -> Self {
        Self
    }
}

impl FieldValidator<str> for EmailValidator {
    fn validate(&self, value: &str) -> Result<(), String> {
        match EMAIL_REGEX.as_ref() {
            Some(regex) if regex.is_match(value.trim()) => Ok(()),
            _ => Err("Invalid email format".to_string()),
        }
    }
}

impl FieldValidator<String> for EmailValidator {
    fn validate(&self, value: &String) -> Result<(), String> {
        FieldValidator::<str>::validate(self, value.as_str())
    }
}

impl FieldValidator<&str> for EmailValidator {
    fn validate(&self, value: &&str) -> Result<(), String> {
        FieldValidator::<str>::validate(self, value)
    }
}

/// Digits-only identity/tax document number with an allowed set of lengths
#[derive(Debug, Clone)]
pub struct DocumentNumberValidator {
    lengths: Vec<usize>,
}

impl DocumentNumberValidator {
    /// Accept any of the given digit counts
    pub fn with_lengths(lengths: &[usize]) -> Self {
        Self { lengths: lengths.to_vec() }
    }
}

impl FieldValidator<str> for DocumentNumberValidator {
    fn validate(&self, value: &str) -> Result<(), String> {
        let val = value.trim();
        if val.is_empty() || !val.chars().all(|c| c.is_ascii_digit()) {
            return Err("Document number must contain only digits".to_string());
        }
        if !self.lengths.contains(&val.len()) {
            let allowed: Vec<String> = self.lengths.iter().map(ToString::to_string).collect();
            return Err(format!("Document number must have {} digits", allowed.join(" or ")));
        }
        Ok(())
    }
}

impl FieldValidator<String> for DocumentNumberValidator {
    fn validate(&self, value: &String) -> Result<(), String> {
        FieldValidator::<str>::validate(self, value.as_str())
    }
}

impl FieldValidator<&str> for DocumentNumberValidator {
    fn validate(&self, value: &&str) -> Result<(), String> {
        FieldValidator::<str>::validate(self, value)
    }
}
