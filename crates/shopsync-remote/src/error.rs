//! # Remote Error Taxonomy
//!
//! Error types for remote entity-service calls.
//!
//! ## Error Categories
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Remote Error Categories                            │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │    Network      │  │   Validation    │  │       NotFound          │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  unreachable /  │  │  payload shape  │  │  mutation target gone   │ │
//! │  │  timeout        │  │  or constraint  │  │  remotely               │ │
//! │  │  RETRYABLE      │  │  rejected       │  │  (delete: treated as    │ │
//! │  │  (by the user)  │  │  NOT retryable  │  │   already satisfied)    │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  ┌─────────────────┐                                                    │
//! │  │      Auth       │  session expired/missing - propagates to force    │
//! │  │                 │  re-authentication outside the core               │
//! │  └─────────────────┘                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The core performs NO retries internally; a `Network` failure is retryable
//! by user action because local state is guaranteed unchanged on failure.

use thiserror::Error;

/// Result type alias for remote operations.
pub type RemoteResult<T> = Result<T, RemoteError>;

/// A failed remote entity-service call.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// Remote unreachable, connection dropped, or request timed out.
    #[error("Remote service unreachable: {0}")]
    Network(String),

    /// The remote rejected the payload shape or a constraint.
    #[error("Remote rejected the request: {0}")]
    Validation(String),

    /// The mutation target no longer exists remotely.
    #[error("{resource} not found on remote: {id}")]
    NotFound { resource: String, id: String },

    /// Session expired or missing; the caller must re-authenticate.
    #[error("Not authenticated: {0}")]
    Auth(String),
}

impl RemoteError {
    /// Creates a NotFound error for a resource/id pair.
    pub fn not_found(resource: impl Into<String>, id: impl Into<String>) -> Self {
        RemoteError::NotFound {
            resource: resource.into(),
            id: id.into(),
        }
    }

    /// True if the operation can be retried by user action without fixing
    /// anything first.
    ///
    /// ## Retryable
    /// - Network failures (local state is unchanged, so retries are safe)
    ///
    /// ## Non-Retryable
    /// - Validation (caller must fix the input)
    /// - NotFound (the target is gone)
    /// - Auth (re-authentication required first)
    pub fn is_retryable(&self) -> bool {
        matches!(self, RemoteError::Network(_))
    }

    /// True if the caller should be routed to re-authentication.
    pub fn is_auth(&self) -> bool {
        matches!(self, RemoteError::Auth(_))
    }
}

// =============================================================================
// Error Conversions
// =============================================================================

/// Transport-level reqwest failures are all network failures from the
/// caller's point of view; HTTP status codes are mapped separately by the
/// REST backend.
impl From<reqwest::Error> for RemoteError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            RemoteError::Network(format!("request timed out: {}", err))
        } else {
            RemoteError::Network(err.to_string())
        }
    }
}
