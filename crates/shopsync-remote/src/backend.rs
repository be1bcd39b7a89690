//! # Remote Backend Contract
//!
//! The generic entity-CRUD contract every remote implementation satisfies.
//!
//! ## The Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │              Remote Entity Service (per collection)                     │
//! │                                                                         │
//! │  list()              -> Vec<record>      Network | Auth                 │
//! │  create(draft)       -> record           Network | Validation | Auth    │
//! │  update(id, patch)   -> record           Network | NotFound | Auth      │
//! │  delete(id)          -> ()               Network | NotFound | Auth      │
//! │                                                                         │
//! │  Records are loosely-typed JSON. The store normalizes them at the       │
//! │  repository boundary; nothing in this crate interprets fields.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All calls are implicitly scoped to the current authenticated user by the
//! service itself. The store is generic over `B: RemoteBackend`, so the REST
//! and in-memory implementations are interchangeable.

use std::future::Future;

use serde_json::Value;

use crate::error::RemoteResult;

// =============================================================================
// Collection
// =============================================================================

/// The entity collections the remote service exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Products,
    Inventory,
    Sales,
    Clients,
    Payments,
    Meetings,
    ProductExpiries,
    Suppliers,
    SalesReturns,
    PurchaseReturns,
}

impl Collection {
    /// The stable path segment / table name for this collection.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Collection::Products => "products",
            Collection::Inventory => "inventory",
            Collection::Sales => "sales",
            Collection::Clients => "clients",
            Collection::Payments => "payments",
            Collection::Meetings => "meetings",
            Collection::ProductExpiries => "product_expiries",
            Collection::Suppliers => "suppliers",
            Collection::SalesReturns => "sales_returns",
            Collection::PurchaseReturns => "purchase_returns",
        }
    }

    /// Every collection, in load order.
    pub const ALL: [Collection; 10] = [
        Collection::Products,
        Collection::Inventory,
        Collection::Sales,
        Collection::Clients,
        Collection::Payments,
        Collection::Meetings,
        Collection::ProductExpiries,
        Collection::Suppliers,
        Collection::SalesReturns,
        Collection::PurchaseReturns,
    ];
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Remote Backend Trait
// =============================================================================

/// A remote entity-CRUD service.
///
/// Methods return `Send` futures so the store can be driven from any tokio
/// runtime flavor. Implementations must be cheap to share behind an `Arc`.
pub trait RemoteBackend: Send + Sync + 'static {
    /// Fetches every record in the collection, newest first.
    fn list(
        &self,
        collection: Collection,
    ) -> impl Future<Output = RemoteResult<Vec<Value>>> + Send;

    /// Creates a record from a draft and returns the confirmed record,
    /// including server-assigned id and timestamps.
    fn create(
        &self,
        collection: Collection,
        draft: Value,
    ) -> impl Future<Output = RemoteResult<Value>> + Send;

    /// Applies a partial update and returns the confirmed record.
    fn update(
        &self,
        collection: Collection,
        id: &str,
        patch: Value,
    ) -> impl Future<Output = RemoteResult<Value>> + Send;

    /// Deletes a record by id.
    fn delete(
        &self,
        collection: Collection,
        id: &str,
    ) -> impl Future<Output = RemoteResult<()>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_paths_are_stable() {
        assert_eq!(Collection::Products.as_str(), "products");
        assert_eq!(Collection::ProductExpiries.as_str(), "product_expiries");
        assert_eq!(Collection::SalesReturns.as_str(), "sales_returns");
    }

    #[test]
    fn test_all_collections_unique() {
        let mut names: Vec<&str> = Collection::ALL.iter().map(|c| c.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), Collection::ALL.len());
    }
}
