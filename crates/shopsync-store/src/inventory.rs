//! # Inventory Reconciliation Engine
//!
//! Moves stock between the two named buckets and reconciles the dual
//! representation of warehouse stock.
//!
//! ## Transfer State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  transfer(product, qty, from, to)                                       │
//! │                                                                         │
//! │  Preconditions (checked BEFORE any remote call):                        │
//! │    qty > 0        → Validation error otherwise                          │
//! │    from != to     → SameBucketTransfer otherwise                        │
//! │    bucket[from] >= qty → InsufficientStock otherwise                    │
//! │                                                                         │
//! │  CURRENT MODE (dedicated record)                                        │
//! │    bucket[from] -= qty; bucket[to] += qty                               │
//! │    current_stock recomputed as the sum, last_updated refreshed          │
//! │    one PATCH to the inventory record                                    │
//! │                                                                         │
//! │  LEGACY MODE (name-tagged sibling rows)                                 │
//! │    (a) decrement the units of the source-tagged product row             │
//! │    (b) find-or-create the destination-tagged row (same base name,       │
//! │        opposite tag) and increment its units, preserving category,      │
//! │        price and reorder level from the source                          │
//! │                                                                         │
//! │  Failure: InsufficientStock names the short bucket and mutates          │
//! │  nothing (all-or-nothing).                                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Restocking always targets the `local` bucket: deliveries land on the shop
//! floor, and warehouse placement is an explicit transfer afterwards.

use chrono::Utc;
use tracing::{debug, info};

use shopsync_core::types::{InventoryRecord, Product, ProductRef};
use shopsync_core::{
    drafts, stock, validation, CoreError, ResolvedStock, StockLocation, StockView,
};
use shopsync_remote::RemoteBackend;

use crate::error::StoreResult;
use crate::repository::EntityRepository;

// =============================================================================
// Stock Engine
// =============================================================================

/// Borrowing view over the product and inventory repositories that performs
/// all stock movements.
///
/// Obtained from [`crate::Store::stock`]; holds no state of its own.
pub struct StockEngine<'a, B: RemoteBackend> {
    products: &'a EntityRepository<Product, B>,
    inventory: &'a EntityRepository<InventoryRecord, B>,
}

impl<'a, B: RemoteBackend> StockEngine<'a, B> {
    pub(crate) fn new(
        products: &'a EntityRepository<Product, B>,
        inventory: &'a EntityRepository<InventoryRecord, B>,
    ) -> Self {
        StockEngine {
            products,
            inventory,
        }
    }

    // =========================================================================
    // Read Path
    // =========================================================================

    /// Resolves which storage mode backs a product's stock, once per read.
    pub async fn resolve(&self, key: &ProductRef) -> StoreResult<ResolvedStock> {
        let products = self.products.list().await;
        let records = self.inventory.list().await;
        Ok(stock::resolve(&products, &records, key)?)
    }

    /// The normalized `{warehouse, local}` view for a product, regardless of
    /// which storage mode backs it.
    pub async fn view(&self, key: &ProductRef) -> StoreResult<StockView> {
        Ok(self.resolve(key).await?.view())
    }

    // =========================================================================
    // Transfer
    // =========================================================================

    /// Moves `quantity` units between the two buckets, all-or-nothing.
    pub async fn transfer(
        &self,
        key: &ProductRef,
        quantity: i64,
        from: StockLocation,
        to: StockLocation,
    ) -> StoreResult<StockView> {
        validation::validate_quantity(quantity).map_err(CoreError::from)?;
        if from == to {
            return Err(CoreError::SameBucketTransfer { bucket: from }.into());
        }

        match self.resolve(key).await? {
            ResolvedStock::DedicatedRecord(record) => {
                self.transfer_record(record, quantity, from, to).await
            }
            ResolvedStock::TaggedRows {
                local_row,
                warehouse_row,
            } => {
                self.transfer_tagged(key, local_row, warehouse_row, quantity, from, to)
                    .await
            }
        }
    }

    /// Current-mode transfer: one bucket patch on the dedicated record.
    async fn transfer_record(
        &self,
        record: InventoryRecord,
        quantity: i64,
        from: StockLocation,
        to: StockLocation,
    ) -> StoreResult<StockView> {
        let available = record.bucket(from);
        if available < quantity {
            return Err(CoreError::InsufficientStock {
                location: from,
                available,
                requested: quantity,
            }
            .into());
        }

        let (warehouse, local) = match from {
            StockLocation::Warehouse => {
                (record.warehouse_stock - quantity, record.local_stock + quantity)
            }
            StockLocation::Local => {
                (record.warehouse_stock + quantity, record.local_stock - quantity)
            }
        };

        let patch = drafts::InventoryPatch::buckets(warehouse, local, Utc::now());
        let updated = self.inventory.update(&record.id, &patch).await?;

        info!(
            product_id = record.product_id,
            quantity,
            %from,
            %to,
            "Transferred stock"
        );
        Ok(StockView::new(updated.warehouse_stock, updated.local_stock))
    }

    /// Legacy-mode transfer across name-tagged sibling rows.
    async fn transfer_tagged(
        &self,
        key: &ProductRef,
        local_row: Option<Product>,
        warehouse_row: Option<Product>,
        quantity: i64,
        from: StockLocation,
        to: StockLocation,
    ) -> StoreResult<StockView> {
        let source = match from {
            StockLocation::Local => local_row,
            StockLocation::Warehouse => warehouse_row,
        };
        let source = match source {
            Some(row) if row.units >= quantity => row,
            other => {
                return Err(CoreError::InsufficientStock {
                    location: from,
                    available: other.map_or(0, |row| row.units),
                    requested: quantity,
                }
                .into())
            }
        };

        // (a) draw down the source-tagged row
        self.products
            .update(&source.id, &drafts::ProductPatch::units(source.units - quantity))
            .await?;

        // (b) find-or-create the destination-tagged row
        let destination_name = stock::tagged_name(&source.name, to);
        match self.products.find_by_name(&destination_name).await {
            Some(destination) => {
                self.products
                    .update(
                        &destination.id,
                        &drafts::ProductPatch::units(destination.units + quantity),
                    )
                    .await?;
            }
            None => {
                // New destination row inherits everything but the units
                let draft = drafts::ProductDraft {
                    name: destination_name,
                    category: source.category.clone(),
                    price: source.price,
                    units: quantity,
                    reorder_level: source.reorder_level,
                    expiry_date: source.expiry_date,
                    supplier: source.supplier.clone(),
                };
                self.products.create(&draft).await?;
            }
        }

        info!(
            product = %source.base_name(),
            quantity,
            %from,
            %to,
            "Transferred stock across tagged rows"
        );
        self.view(key).await
    }

    // =========================================================================
    // Restock
    // =========================================================================

    /// Adds `quantity` units of fresh stock to the `local` bucket.
    ///
    /// Products still in legacy mode get their dedicated inventory record
    /// created here, seeded from the derived tagged-row view; this is the
    /// migration path onto the inventory table. Products without a legacy
    /// numeric id stay in legacy mode (there is no key to hang a record on)
    /// and have their local-tagged row incremented directly.
    pub async fn restock(&self, key: &ProductRef, quantity: i64) -> StoreResult<StockView> {
        validation::validate_quantity(quantity).map_err(CoreError::from)?;

        match self.resolve(key).await? {
            ResolvedStock::DedicatedRecord(record) => {
                let patch = drafts::InventoryPatch::buckets(
                    record.warehouse_stock,
                    record.local_stock + quantity,
                    Utc::now(),
                );
                let updated = self.inventory.update(&record.id, &patch).await?;

                info!(product_id = record.product_id, quantity, "Restocked");
                Ok(StockView::new(updated.warehouse_stock, updated.local_stock))
            }
            ResolvedStock::TaggedRows {
                local_row,
                warehouse_row,
            } => {
                let resolved_view = StockView::new(
                    warehouse_row.as_ref().map_or(0, |p| p.units),
                    local_row.as_ref().map_or(0, |p| p.units),
                );
                let product = self
                    .products
                    .resolve_ref(key)
                    .await
                    .ok_or_else(|| CoreError::ProductNotFound(key.to_string()))?;

                if product.product_id == 0 {
                    // No legacy key: bump the local-tagged row in place
                    let target = local_row.unwrap_or(product);
                    self.products
                        .update(&target.id, &drafts::ProductPatch::units(target.units + quantity))
                        .await?;
                    debug!(product = %target.base_name(), quantity, "Restocked tagged row");
                    return self.view(key).await;
                }

                let draft = drafts::InventoryDraft::new(
                    product.product_id,
                    product.base_name(),
                    resolved_view.warehouse,
                    resolved_view.local + quantity,
                    product.reorder_level,
                );
                let record = self.inventory.create(&draft).await?;

                info!(
                    product_id = record.product_id,
                    quantity, "Restocked; product migrated to a dedicated inventory record"
                );
                Ok(StockView::new(record.warehouse_stock, record.local_stock))
            }
        }
    }
}
