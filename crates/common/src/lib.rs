//! Modular common utilities shared across PrintShop crates.
//!
//! # Feature Tiers
//!
//! Enable cargo features to opt into the tiers you need:
//! - `foundation`: field validation and the clock abstraction
//! - `observability`: tracing instrumentation (implies `foundation`)
//! - `platform`: pooled SQLite storage (implies `observability`)

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

// Foundation tier
// -----------------------------------------------------------------
#[cfg(feature = "foundation")]
pub mod time;
#[cfg(feature = "foundation")]
pub mod validation;

// Platform tier
// -------------------------------------------------------------------
#[cfg(feature = "platform")]
pub mod storage;

// Re-export commonly used types and traits for convenience
// ------------------------
#[cfg(feature = "platform")]
pub use storage::{StorageError, StorageResult};
#[cfg(feature = "foundation")]
pub use time::{Clock, FixedClock, SystemClock};
#[cfg(feature = "foundation")]
pub use validation::{
    DocumentNumberValidator, EmailValidator, FieldValidator, RangeValidator, StringValidator,
    ValidationError, ValidationResult,
};
