//! # Error Types
//!
//! Domain-specific error types for shopsync-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  shopsync-core errors (this file)                                      │
//! │  ├── CoreError        - Domain rule violations                         │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  shopsync-remote errors (separate crate)                               │
//! │  └── RemoteError      - Network / Validation / NotFound / Auth         │
//! │                                                                         │
//! │  shopsync-store errors (separate crate)                                │
//! │  └── StoreError       - What callers of the store see                  │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → StoreError → UI                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (product ref, bucket, counts)
//! 3. Errors are enum variants, never String
//! 4. Each error variant maps to a user-facing message

use thiserror::Error;

use crate::stock::StockLocation;

// =============================================================================
// Core Error
// =============================================================================

/// Core domain errors.
///
/// These errors represent business rule violations or domain logic failures.
/// They should be caught and translated to user-friendly messages.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Product cannot be found in the cached catalog.
    ///
    /// ## When This Occurs
    /// - Neither the string id nor the legacy numeric id matches any row
    /// - The product was deleted and the catalog already reflects it
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Insufficient stock in the source bucket for a transfer.
    ///
    /// Raised BEFORE any remote call is issued, so a failed transfer never
    /// mutates either bucket.
    #[error("Insufficient {location} stock: available {available}, requested {requested}")]
    InsufficientStock {
        location: StockLocation,
        available: i64,
        requested: i64,
    },

    /// Transfer where source and destination are the same bucket.
    #[error("Cannot transfer stock from {bucket} to itself")]
    SameBucketTransfer { bucket: StockLocation },

    /// A remote record was too malformed to normalize even leniently.
    ///
    /// ## When This Occurs
    /// - Record carries no usable identifier at all
    /// - A confirmed mutation response is not an object
    ///
    /// Records failing this way during a bulk load are skipped, not fatal.
    #[error("Malformed {collection} record: {reason}")]
    MalformedRecord {
        collection: &'static str,
        reason: String,
    },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Creates a MalformedRecord error for a given collection.
    pub fn malformed(collection: &'static str, reason: impl Into<String>) -> Self {
        CoreError::MalformedRecord {
            collection,
            reason: reason.into(),
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when caller input doesn't meet requirements.
/// Used for early validation before any remote call is issued.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., invalid date).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
