//! # Store Error Type
//!
//! Unified error type for store operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  RemoteError (shopsync-remote)     CoreError (shopsync-core)           │
//! │       │                                 │                               │
//! │       └────────────┬────────────────────┘                               │
//! │                    ▼                                                    │
//! │  StoreError (this module) ← what every store method surfaces           │
//! │                    │                                                    │
//! │                    ▼                                                    │
//! │  Dashboard shows the message once per attempt; local state is          │
//! │  guaranteed unchanged on failure, so user retries are always safe.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The store never swallows an error: every repository/engine method either
//! returns the confirmed result or surfaces one of these to its caller.

use thiserror::Error;

use shopsync_core::{CoreError, ValidationError};
use shopsync_remote::RemoteError;

/// Result type alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// A failed store operation.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The remote call failed; local state is unchanged.
    #[error(transparent)]
    Remote(#[from] RemoteError),

    /// A domain rule rejected the operation before any remote call.
    #[error(transparent)]
    Domain(#[from] CoreError),

    /// A draft or patch could not be encoded into a wire payload.
    #[error("Failed to encode payload: {0}")]
    Encode(String),
}

impl From<ValidationError> for StoreError {
    fn from(err: ValidationError) -> Self {
        StoreError::Domain(CoreError::Validation(err))
    }
}

impl StoreError {
    /// True if the user may simply retry the action.
    ///
    /// Failed mutations leave the cache untouched, so retrying a retryable
    /// failure is always safe.
    pub fn is_retryable(&self) -> bool {
        matches!(self, StoreError::Remote(remote) if remote.is_retryable())
    }

    /// True if the caller should be routed to re-authentication.
    pub fn is_auth(&self) -> bool {
        matches!(self, StoreError::Remote(remote) if remote.is_auth())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categorization() {
        let network: StoreError = RemoteError::Network("down".into()).into();
        assert!(network.is_retryable());
        assert!(!network.is_auth());

        let auth: StoreError = RemoteError::Auth("expired".into()).into();
        assert!(auth.is_auth());
        assert!(!auth.is_retryable());

        let domain: StoreError = CoreError::ProductNotFound("p1".into()).into();
        assert!(!domain.is_retryable());
        assert!(!domain.is_auth());
    }

    #[test]
    fn test_validation_wraps_into_domain() {
        let err: StoreError = ValidationError::MustBePositive {
            field: "quantity".into(),
        }
        .into();
        assert!(matches!(err, StoreError::Domain(CoreError::Validation(_))));
    }
}
