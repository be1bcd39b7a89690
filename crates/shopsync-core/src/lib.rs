//! # shopsync-core: Pure Domain Logic for ShopSync
//!
//! This crate is the **heart** of the ShopSync store. It contains the domain
//! model and every pure computation the store performs, with zero I/O
//! dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        ShopSync Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Dashboard UI (excluded)                      │   │
//! │  │    Products ──► Sales ──► Inventory ──► Dashboard charts       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 shopsync-store (Store façade)                   │   │
//! │  │    repositories, mutation path, stock engine, analytics        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ shopsync-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   stock   │  │   wire    │  │   │
//! │  │   │  Product  │  │   Money   │  │ StockView │  │  lenient  │  │   │
//! │  │   │   Sale    │  │ integer   │  │ resolution│  │  readers  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • NO CLOCK • PURE FUNCTIONS              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Sale, InventoryRecord, etc.)
//! - [`drafts`] - Typed create/update payloads per entity
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`stock`] - Stock buckets, name-tag handling, resolved stock views
//! - [`wire`] - Lenient readers that normalize loosely-typed remote records
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation rules
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Network, file system, and clock access are FORBIDDEN here
//! 3. **Integer Money**: All monetary values are minor units (i64), never floats
//! 4. **Explicit Errors**: All errors are typed, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod drafts;
pub mod error;
pub mod money;
pub mod stock;
pub mod types;
pub mod validation;
pub mod wire;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use shopsync_core::Money` instead of
// `use shopsync_core::money::Money`

pub use drafts::*;
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use stock::{ResolvedStock, StockLocation, StockView};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Name suffix marking a product row as the warehouse-located stock of its
/// base product (the legacy encoding that predates dedicated inventory
/// records).
pub const WAREHOUSE_SUFFIX: &str = " (Warehouse)";

/// Reorder level assigned when the remote record carries none.
pub const DEFAULT_REORDER_LEVEL: i64 = 5;

/// Category assigned when the remote record carries none.
pub const DEFAULT_CATEGORY: &str = "Uncategorized";

/// How many products the top-by-revenue ranking returns.
pub const TOP_PRODUCTS_LIMIT: usize = 5;

/// Upper bound for a single stock movement (transfer or restock).
///
/// Guards against fat-fingered quantities (e.g. a barcode scanned into the
/// quantity field) before anything reaches the remote.
pub const MAX_STOCK_QUANTITY: i64 = 1_000_000;
