//! # shopsync-store: The Synchronized Store
//!
//! A process-wide cache of normalized business entities kept consistent with
//! a remote entity-CRUD service across many independent mutation paths.
//!
//! ## Data Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        ShopSync Store Data Flow                         │
//! │                                                                         │
//! │  UI action                                                              │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  Store façade method (store.rs)                                         │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  Confirm-then-apply mutation path (repository.rs)                       │
//! │     │   (1) await the remote call                                       │
//! │     │   (2) on success, apply the confirmed record locally              │
//! │     │   (3) on failure, local state is untouched                        │
//! │     ▼                                                                   │
//! │  Entity collection update                                               │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  Derived analytics recomputed lazily on next read (analytics.rs)       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`entity`] - The `Entity` trait: collection binding + wire normalization
//! - [`repository`] - Generic repository with the confirm-then-apply path
//! - [`inventory`] - Stock reconciliation engine (transfers, restock, dual mode)
//! - [`analytics`] - Pure derived projections over repository snapshots
//! - [`store`] - The composed store façade (`load_all` / `clear`)
//! - [`error`] - Store error type
//!
//! ## Concurrency Model
//!
//! Single logical writer per entity kind: each mutation on a given entity is
//! awaited to completion by its caller before the next one is issued. Remote
//! fetches may run concurrently across entity kinds (session-start
//! `load_all`). Two racing updates to the same id resolve last-applied-wins;
//! an accepted risk in a single-operator dashboard.

// =============================================================================
// Module Declarations
// =============================================================================

pub mod analytics;
pub mod entity;
pub mod error;
pub mod inventory;
pub mod repository;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use analytics::{
    DashboardAnalytics, InventorySummary, ProductRevenue, RevenuePoint, SalesSummary,
};
pub use entity::{Entity, Patchable};
pub use error::{StoreError, StoreResult};
pub use inventory::StockEngine;
pub use repository::{EntityRepository, ImportReport};
pub use store::Store;
