//! Shared helpers for core services

pub mod codes;

use printshop_common::validation::ValidationError;
use printshop_domain::PrintShopError;

/// Map collected field failures onto the domain error
pub fn invalid_input(err: ValidationError) -> PrintShopError {
    PrintShopError::InvalidInput(err.to_string())
}

/// Trim an optional text field, treating blank as absent
pub fn clean(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}
