//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for the print shop ERP
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum PrintShopError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A workflow event that the current order/phase state does not allow
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    /// A uniqueness rule was violated (duplicate document, double invoice...)
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl PrintShopError {
    /// Message that can be shown to an operator as-is.
    ///
    /// Validation and workflow errors carry their own wording; storage and
    /// internal failures collapse to a generic retry message.
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidInput(msg)
            | Self::InvalidTransition(msg)
            | Self::Conflict(msg)
            | Self::NotFound(msg)
            | Self::Auth(msg) => msg.clone(),
            Self::Config(_) => "The application is not configured correctly.".to_string(),
            Self::Database(_) | Self::Internal(_) => {
                "The operation could not be completed. Please try again.".to_string()
            }
        }
    }
}

/// Result type alias for print shop operations
pub type Result<T> = std::result::Result<T, PrintShopError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_type_tag() {
        let err = PrintShopError::Conflict("Esta orden ya fue facturada.".into());
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["type"], "Conflict");
        assert_eq!(json["message"], "Esta orden ya fue facturada.");
    }

    #[test]
    fn storage_failures_are_generic_for_users() {
        let err = PrintShopError::Database("sqlite failure (code 5)".into());
        assert!(!err.user_message().contains("sqlite"));
        let err = PrintShopError::InvalidInput("Quantity must be positive".into());
        assert_eq!(err.user_message(), "Quantity must be positive");
    }
}
