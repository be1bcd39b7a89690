//! # shopsync-remote: Remote Entity Service Boundary
//!
//! This crate defines the generic remote entity-CRUD contract the store
//! synchronizes against, plus its two implementations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        ShopSync Data Flow                               │
//! │                                                                         │
//! │  Store façade / repositories (shopsync-store)                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  shopsync-remote (THIS CRATE)                   │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │ RemoteBackend │    │  RestBackend  │    │MemoryBackend │  │   │
//! │  │   │   (trait)     │◄───│  (reqwest)    │    │ (tests/demo) │  │   │
//! │  │   │               │    │               │    │              │  │   │
//! │  │   │ list/create/  │    │ GET/POST/     │    │ HashMap +    │  │   │
//! │  │   │ update/delete │    │ PATCH/DELETE  │    │ fail_next    │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Remote entity-CRUD service (excluded collaborator)                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`backend`] - The `RemoteBackend` trait and `Collection` enum
//! - [`rest`] - HTTP implementation against a generic JSON CRUD API
//! - [`memory`] - In-memory implementation with failure injection
//! - [`config`] - Endpoint configuration (TOML file + env overrides)
//! - [`error`] - The remote error taxonomy
//!
//! ## Usage
//!
//! ```rust,ignore
//! use shopsync_remote::{Collection, RemoteBackend, RestBackend, RemoteConfig};
//!
//! let config = RemoteConfig::load()?;
//! let backend = RestBackend::new(&config)?;
//! let products = backend.list(Collection::Products).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod backend;
pub mod config;
pub mod error;
pub mod memory;
pub mod rest;

// =============================================================================
// Re-exports
// =============================================================================

pub use backend::{Collection, RemoteBackend};
pub use config::{ConfigError, RemoteConfig};
pub use error::{RemoteError, RemoteResult};
pub use memory::MemoryBackend;
pub use rest::RestBackend;
