//! # Entity Repository
//!
//! The generic per-entity repository: one owned in-memory collection plus
//! the confirm-then-apply mutation path every entity kind flows through.
//!
//! ## Confirm-Then-Apply
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Mutation Discipline                                  │
//! │                                                                         │
//! │  (1) await the remote call                                              │
//! │         │                                                               │
//! │         ├── failure ──► local collection UNTOUCHED, typed error        │
//! │         │               surfaces to the caller (retries always safe)   │
//! │         ▼                                                               │
//! │  (2) decode the confirmed record (server-assigned id, timestamps,      │
//! │      computed totals)                                                   │
//! │         ▼                                                               │
//! │  (3) apply locally:                                                     │
//! │        create  → prepend (newest first)                                 │
//! │        update  → replace in place, position preserved                   │
//! │        delete  → remove                                                 │
//! │                                                                         │
//! │  The remote is authoritative for generated fields, so nothing is       │
//! │  applied speculatively; the cost is latency before UI feedback.        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Edge-Case Policy
//! - `update`/`delete` confirmed remotely for an id not present locally is a
//!   success no-op (the remote is the source of truth).
//! - `delete` answered `NotFound` by the remote is already satisfied:
//!   deleting twice succeeds both times.
//! - `load_all` skips records that fail even lenient decoding, with a
//!   warning; a single bad row never fails a session load.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, warn};

use shopsync_core::types::{
    Client, InventoryRecord, Meeting, Product, ProductExpiry, SalesReturn,
};
use shopsync_core::{drafts, stock, validation, ProductRef};
use shopsync_remote::{RemoteBackend, RemoteError};

use crate::entity::{Entity, Patchable};
use crate::error::{StoreError, StoreResult};

// =============================================================================
// Entity Repository
// =============================================================================

/// Owns the canonical in-memory collection for one entity kind.
///
/// All other components (analytics, UI) read snapshots and never mutate the
/// collection directly. The repository holds no mutation queue or lock
/// beyond the collection's own; callers await each mutation to completion
/// before issuing the next one for the same entity.
pub struct EntityRepository<T: Entity, B: RemoteBackend> {
    backend: Arc<B>,
    items: RwLock<Vec<T>>,
}

impl<T: Entity, B: RemoteBackend> EntityRepository<T, B> {
    /// Creates an empty repository over the shared backend.
    pub fn new(backend: Arc<B>) -> Self {
        EntityRepository {
            backend,
            items: RwLock::new(Vec::new()),
        }
    }

    /// Snapshot of the current collection, insertion order preserved
    /// (newest first, since `create` prepends).
    pub async fn list(&self) -> Vec<T> {
        self.items.read().await.clone()
    }

    /// Looks up a cached entity by id.
    pub async fn get(&self, id: &str) -> Option<T> {
        self.items
            .read()
            .await
            .iter()
            .find(|item| item.entity_id() == id)
            .cloned()
    }

    /// Number of cached entities.
    pub async fn count(&self) -> usize {
        self.items.read().await.len()
    }

    /// Replaces the entire collection with a fresh remote fetch.
    ///
    /// Used at session start and for on-demand resync. Undecodable records
    /// are skipped with a warning rather than failing the load.
    pub async fn load_all(&self) -> StoreResult<()> {
        let records = self.backend.list(T::COLLECTION).await?;

        let mut decoded = Vec::with_capacity(records.len());
        for record in &records {
            match T::decode(record) {
                Ok(entity) => decoded.push(entity),
                Err(err) => {
                    warn!(collection = %T::COLLECTION, %err, "Skipping undecodable record");
                }
            }
        }

        debug!(collection = %T::COLLECTION, count = decoded.len(), "Loaded collection");
        *self.items.write().await = decoded;
        Ok(())
    }

    /// Creates an entity from a draft.
    ///
    /// On success the remote-confirmed entity (with server-assigned id and
    /// timestamps) is prepended to the collection and returned. On failure
    /// the collection is unchanged.
    pub async fn create(&self, draft: &T::Draft) -> StoreResult<T> {
        let payload =
            serde_json::to_value(draft).map_err(|e| StoreError::Encode(e.to_string()))?;

        let confirmed = self.backend.create(T::COLLECTION, payload).await?;
        let entity = T::decode(&confirmed)?;

        debug!(collection = %T::COLLECTION, id = entity.entity_id(), "Created entity");
        self.items.write().await.insert(0, entity.clone());
        Ok(entity)
    }

    /// Deletes an entity by id.
    ///
    /// A remote `NotFound` is treated as already satisfied, so deleting an
    /// already-deleted id succeeds (idempotent).
    pub async fn delete(&self, id: &str) -> StoreResult<()> {
        match self.backend.delete(T::COLLECTION, id).await {
            Ok(()) => {}
            Err(RemoteError::NotFound { .. }) => {
                debug!(collection = %T::COLLECTION, id, "Delete target already gone remotely");
            }
            Err(err) => return Err(err.into()),
        }

        self.items.write().await.retain(|item| item.entity_id() != id);
        Ok(())
    }

    /// Drops the cached collection (session teardown). No remote call.
    pub async fn clear(&self) {
        self.items.write().await.clear();
    }
}

impl<T: Patchable, B: RemoteBackend> EntityRepository<T, B> {
    /// Applies a partial update.
    ///
    /// On success the confirmed entity replaces the matching cached entry in
    /// place, preserving its position; an entry absent locally is a success
    /// no-op. A remote `NotFound` is a hard failure for updates.
    pub async fn update(&self, id: &str, patch: &T::Patch) -> StoreResult<T> {
        let payload =
            serde_json::to_value(patch).map_err(|e| StoreError::Encode(e.to_string()))?;

        let confirmed = self.backend.update(T::COLLECTION, id, payload).await?;
        let entity = T::decode(&confirmed)?;

        let mut items = self.items.write().await;
        if let Some(slot) = items.iter_mut().find(|item| item.entity_id() == id) {
            *slot = entity.clone();
        }
        debug!(collection = %T::COLLECTION, id, "Updated entity");
        Ok(entity)
    }
}

// =============================================================================
// Product Queries & Bulk Import
// =============================================================================

/// Outcome of a bulk product import.
///
/// Mirrors the import flow's skip-and-count behavior: bad rows are reported,
/// good rows still land.
#[derive(Debug, Default)]
pub struct ImportReport {
    /// Rows successfully created.
    pub imported: usize,
    /// `(row index, reason)` for every rejected row.
    pub failures: Vec<(usize, String)>,
}

impl<B: RemoteBackend> EntityRepository<Product, B> {
    /// Resolves a product by either of its identities.
    pub async fn resolve_ref(&self, key: &ProductRef) -> Option<Product> {
        self.items
            .read()
            .await
            .iter()
            .find(|p| p.matches(key))
            .cloned()
    }

    /// Finds a product row by exact name (tagged names included).
    pub async fn find_by_name(&self, name: &str) -> Option<Product> {
        let items = self.items.read().await;
        stock::find_by_name(&items, name).cloned()
    }

    /// Creates products in bulk, one create per row.
    ///
    /// Rows failing validation or rejected by the remote are skipped and
    /// reported; the remaining rows still import. Each accepted row lands in
    /// the cache exactly like a single `create`.
    pub async fn import_many(&self, rows: Vec<drafts::ProductDraft>) -> ImportReport {
        let mut report = ImportReport::default();

        for (index, draft) in rows.into_iter().enumerate() {
            if let Err(err) = validation::validate_product_name(&draft.name) {
                report.failures.push((index, err.to_string()));
                continue;
            }

            match self.create(&draft).await {
                Ok(_) => report.imported += 1,
                Err(err) => report.failures.push((index, err.to_string())),
            }
        }

        debug!(
            imported = report.imported,
            failed = report.failures.len(),
            "Product import finished"
        );
        report
    }
}

// =============================================================================
// Inventory Queries
// =============================================================================

impl<B: RemoteBackend> EntityRepository<InventoryRecord, B> {
    /// The dedicated record for a product, when one exists.
    pub async fn find_by_product_id(&self, product_id: i64) -> Option<InventoryRecord> {
        self.items
            .read()
            .await
            .iter()
            .find(|r| r.product_id == product_id)
            .cloned()
    }
}

// =============================================================================
// Meeting Queries
// =============================================================================

impl<B: RemoteBackend> EntityRepository<Meeting, B> {
    /// Meetings scheduled with one client.
    pub async fn for_client(&self, client_id: &str) -> Vec<Meeting> {
        self.items
            .read()
            .await
            .iter()
            .filter(|m| m.client_id.as_deref() == Some(client_id))
            .cloned()
            .collect()
    }
}

// =============================================================================
// Expiry Queries
// =============================================================================

impl<B: RemoteBackend> EntityRepository<ProductExpiry, B> {
    /// Batches expiring within the next `days` days (not yet expired).
    pub async fn expiring_within(&self, days: i64, today: chrono::NaiveDate) -> Vec<ProductExpiry> {
        self.items
            .read()
            .await
            .iter()
            .filter(|e| e.expires_within(days, today))
            .cloned()
            .collect()
    }

    /// Batches already past their expiry date.
    pub async fn expired(&self, today: chrono::NaiveDate) -> Vec<ProductExpiry> {
        self.items
            .read()
            .await
            .iter()
            .filter(|e| e.is_expired(today))
            .cloned()
            .collect()
    }
}

// =============================================================================
// Client Queries
// =============================================================================

impl<B: RemoteBackend> EntityRepository<Client, B> {
    /// Finds a client by exact name (sales forms key on the name).
    pub async fn find_by_name(&self, name: &str) -> Option<Client> {
        self.items
            .read()
            .await
            .iter()
            .find(|c| c.name == name)
            .cloned()
    }
}

// =============================================================================
// Return Queries
// =============================================================================

impl<B: RemoteBackend> EntityRepository<SalesReturn, B> {
    /// Returns filed against one sale.
    pub async fn for_sale(&self, sale_id: &str) -> Vec<SalesReturn> {
        self.items
            .read()
            .await
            .iter()
            .filter(|r| r.sale_id.as_deref() == Some(sale_id))
            .cloned()
            .collect()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use shopsync_core::Money;
    use shopsync_remote::{Collection, MemoryBackend};

    fn client_repo() -> EntityRepository<Client, MemoryBackend> {
        EntityRepository::new(Arc::new(MemoryBackend::new()))
    }

    #[tokio::test]
    async fn test_create_prepends_confirmed_entity() {
        let repo = client_repo();

        let first = repo.create(&drafts::ClientDraft::new("First")).await.unwrap();
        let second = repo
            .create(&drafts::ClientDraft::new("Second"))
            .await
            .unwrap();

        assert!(!first.id.is_empty());
        let listed = repo.list().await;
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, second.id);
        assert_eq!(listed[1].id, first.id);
    }

    #[tokio::test]
    async fn test_update_preserves_position() {
        let repo = client_repo();
        repo.create(&drafts::ClientDraft::new("A")).await.unwrap();
        let target = repo.create(&drafts::ClientDraft::new("B")).await.unwrap();
        repo.create(&drafts::ClientDraft::new("C")).await.unwrap();

        let patch = drafts::ClientPatch {
            city: Some("Mumbai".to_string()),
            ..drafts::ClientPatch::default()
        };
        repo.update(&target.id, &patch).await.unwrap();

        let listed = repo.list().await;
        assert_eq!(listed[1].id, target.id);
        assert_eq!(listed[1].city.as_deref(), Some("Mumbai"));
        // Untouched fields survive the patch
        assert_eq!(listed[1].name, "B");
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let repo = client_repo();
        let client = repo.create(&drafts::ClientDraft::new("A")).await.unwrap();

        repo.delete(&client.id).await.unwrap();
        assert_eq!(repo.count().await, 0);

        // Second delete: remote answers NotFound, still a success
        repo.delete(&client.id).await.unwrap();
    }

    #[tokio::test]
    async fn test_failed_create_leaves_collection_unchanged() {
        let backend = Arc::new(MemoryBackend::new());
        let repo: EntityRepository<Client, _> = EntityRepository::new(backend.clone());
        repo.create(&drafts::ClientDraft::new("Existing")).await.unwrap();
        let before = repo.list().await;

        backend.fail_next(RemoteError::Network("down".into()));
        let err = repo
            .create(&drafts::ClientDraft::new("Doomed"))
            .await
            .unwrap_err();
        assert!(err.is_retryable());
        assert_eq!(repo.list().await, before);
    }

    #[tokio::test]
    async fn test_load_all_skips_undecodable_rows() {
        let backend = Arc::new(MemoryBackend::new());
        backend
            .seed(
                Collection::Clients,
                vec![
                    json!({"id": "c1", "name": "Good"}),
                    json!({"name": "No id at all"}),
                    json!({"id": "c2", "name": "Also good"}),
                ],
            )
            .await;

        let repo: EntityRepository<Client, _> = EntityRepository::new(backend);
        repo.load_all().await.unwrap();
        assert_eq!(repo.count().await, 2);
    }

    #[tokio::test]
    async fn test_import_many_skips_bad_rows() {
        let backend = Arc::new(MemoryBackend::new());
        let repo: EntityRepository<Product, _> = EntityRepository::new(backend);

        let rows = vec![
            drafts::ProductDraft::new("Pen", Money::from_cents(1000), 10),
            drafts::ProductDraft::new("   ", Money::from_cents(500), 5),
            drafts::ProductDraft::new("Notebook", Money::from_cents(2500), 3),
        ];
        let report = repo.import_many(rows).await;

        assert_eq!(report.imported, 2);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].0, 1);
        assert_eq!(repo.count().await, 2);
    }
}
