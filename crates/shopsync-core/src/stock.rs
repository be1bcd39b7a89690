//! # Stock Module
//!
//! Stock buckets, warehouse name-tag handling, and the resolved stock view.
//!
//! ## The Dual Representation Problem
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Warehouse stock is encoded TWO ways in the catalog:                    │
//! │                                                                         │
//! │  LEGACY MODE (name tag)              CURRENT MODE (dedicated record)    │
//! │  ──────────────────────              ───────────────────────────────    │
//! │  "Pen"             units=10          InventoryRecord {                  │
//! │  "Pen (Warehouse)" units=4             product_id: 42,                  │
//! │                                        local_stock: 10,                 │
//! │  Two product rows share one            warehouse_stock: 4,              │
//! │  logical identity.                     current_stock: 14,               │
//! │                                      }                                  │
//! │                                                                         │
//! │  Not all products have been migrated, so BOTH must be supported.        │
//! │  `resolve` picks the backing mode once per read; callers only ever      │
//! │  see one normalized {warehouse, local} view.                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything in this module is pure: resolution operates on snapshots of the
//! cached collections and never touches the remote.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::types::{InventoryRecord, Product, ProductRef};
use crate::WAREHOUSE_SUFFIX;

// =============================================================================
// Name Tagging
// =============================================================================

/// True when the name carries the warehouse tag.
#[inline]
pub fn is_warehouse_name(name: &str) -> bool {
    name.ends_with(WAREHOUSE_SUFFIX)
}

/// Strips the warehouse tag, returning the base product name.
#[inline]
pub fn base_name(name: &str) -> &str {
    name.strip_suffix(WAREHOUSE_SUFFIX).unwrap_or(name)
}

/// The warehouse-tagged name for a base product name.
///
/// Idempotent: tagging an already-tagged name returns it unchanged.
pub fn warehouse_name(name: &str) -> String {
    format!("{}{}", base_name(name), WAREHOUSE_SUFFIX)
}

/// The name a product row must carry to live in the given bucket.
pub fn tagged_name(name: &str, location: StockLocation) -> String {
    match location {
        StockLocation::Local => base_name(name).to_string(),
        StockLocation::Warehouse => warehouse_name(name),
    }
}

// =============================================================================
// Stock Location
// =============================================================================

/// One of the two named stock buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum StockLocation {
    /// Back-room / warehouse stock.
    Warehouse,
    /// Local shop floor stock.
    Local,
}

impl StockLocation {
    /// The opposite bucket.
    #[inline]
    pub fn other(&self) -> Self {
        match self {
            StockLocation::Warehouse => StockLocation::Local,
            StockLocation::Local => StockLocation::Warehouse,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StockLocation::Warehouse => "warehouse",
            StockLocation::Local => "local",
        }
    }
}

impl std::fmt::Display for StockLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Stock View
// =============================================================================

/// The normalized per-product stock view every caller sees, regardless of
/// which storage mode backs the product.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct StockView {
    pub warehouse: i64,
    pub local: i64,
}

impl StockView {
    pub fn new(warehouse: i64, local: i64) -> Self {
        StockView { warehouse, local }
    }

    /// Total on-hand units across both buckets.
    #[inline]
    pub fn current(&self) -> i64 {
        self.warehouse + self.local
    }

    /// Units in the named bucket.
    #[inline]
    pub fn bucket(&self, location: StockLocation) -> i64 {
        match location {
            StockLocation::Warehouse => self.warehouse,
            StockLocation::Local => self.local,
        }
    }
}

// =============================================================================
// Resolved Stock
// =============================================================================

/// Which storage mode backs a product's stock, resolved once per read.
///
/// The variants carry owned snapshots of the backing rows so the caller can
/// route a mutation to the right place without re-scanning the collections.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedStock {
    /// Current mode: a dedicated inventory record exists for the product.
    DedicatedRecord(InventoryRecord),

    /// Legacy mode: stock is tracked via name-tagged sibling product rows.
    /// Either row may be absent; an absent bucket reads as zero.
    TaggedRows {
        local_row: Option<Product>,
        warehouse_row: Option<Product>,
    },
}

impl ResolvedStock {
    /// The normalized `{warehouse, local}` view for this product.
    pub fn view(&self) -> StockView {
        match self {
            ResolvedStock::DedicatedRecord(record) => {
                StockView::new(record.warehouse_stock, record.local_stock)
            }
            ResolvedStock::TaggedRows {
                local_row,
                warehouse_row,
            } => StockView::new(
                warehouse_row.as_ref().map_or(0, |p| p.units),
                local_row.as_ref().map_or(0, |p| p.units),
            ),
        }
    }
}

// =============================================================================
// Resolution
// =============================================================================

/// Finds a product by either of its identities.
pub fn find_product<'a>(products: &'a [Product], key: &ProductRef) -> Option<&'a Product> {
    products.iter().find(|p| p.matches(key))
}

/// Finds a product row by exact name.
pub fn find_by_name<'a>(products: &'a [Product], name: &str) -> Option<&'a Product> {
    products.iter().find(|p| p.name == name)
}

/// Resolves which storage mode backs a product's stock.
///
/// ## Read Path
/// 1. Locate the product by either identity.
/// 2. If a dedicated inventory record exists for its `product_id`, that
///    record is authoritative.
/// 3. Otherwise locate the name-tagged sibling rows and treat their unit
///    counts as the bucket values (absent rows read as zero).
pub fn resolve(
    products: &[Product],
    records: &[InventoryRecord],
    key: &ProductRef,
) -> CoreResult<ResolvedStock> {
    let product =
        find_product(products, key).ok_or_else(|| CoreError::ProductNotFound(key.to_string()))?;

    if product.product_id != 0 {
        if let Some(record) = records.iter().find(|r| r.product_id == product.product_id) {
            return Ok(ResolvedStock::DedicatedRecord(record.clone()));
        }
    }

    let base = product.base_name();
    let local_row = find_by_name(products, base).cloned();
    let warehouse_row = find_by_name(products, &warehouse_name(base)).cloned();

    Ok(ResolvedStock::TaggedRows {
        local_row,
        warehouse_row,
    })
}

/// All distinct base identities in the catalog, in first-seen order.
///
/// Merges each product's local- and warehouse-tagged rows into one logical
/// entity; this is the grouping key for reporting.
pub fn resolved_identities(products: &[Product]) -> Vec<&str> {
    let mut seen: Vec<&str> = Vec::new();
    for product in products {
        let base = product.base_name();
        if !seen.contains(&base) {
            seen.push(base);
        }
    }
    seen
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;

    fn product(id: &str, product_id: i64, name: &str, units: i64) -> Product {
        Product {
            id: id.to_string(),
            product_id,
            name: name.to_string(),
            category: "Stationery".to_string(),
            price: Money::from_cents(1000),
            units,
            reorder_level: 5,
            expiry_date: None,
            supplier: None,
            created_at: None,
        }
    }

    fn record(product_id: i64, warehouse: i64, local: i64) -> InventoryRecord {
        InventoryRecord {
            id: format!("inv-{}", product_id),
            product_id,
            product_name: "Pen".to_string(),
            current_stock: warehouse + local,
            warehouse_stock: warehouse,
            local_stock: local,
            reserved_stock: 0,
            reorder_level: 5,
            last_updated: None,
        }
    }

    #[test]
    fn test_name_tagging() {
        assert!(is_warehouse_name("Pen (Warehouse)"));
        assert!(!is_warehouse_name("Pen"));

        assert_eq!(base_name("Pen (Warehouse)"), "Pen");
        assert_eq!(base_name("Pen"), "Pen");

        assert_eq!(warehouse_name("Pen"), "Pen (Warehouse)");
        // Tagging is idempotent
        assert_eq!(warehouse_name("Pen (Warehouse)"), "Pen (Warehouse)");

        assert_eq!(tagged_name("Pen (Warehouse)", StockLocation::Local), "Pen");
        assert_eq!(
            tagged_name("Pen", StockLocation::Warehouse),
            "Pen (Warehouse)"
        );
    }

    #[test]
    fn test_location_other() {
        assert_eq!(StockLocation::Warehouse.other(), StockLocation::Local);
        assert_eq!(StockLocation::Local.other(), StockLocation::Warehouse);
    }

    #[test]
    fn test_view_totals() {
        let view = StockView::new(7, 8);
        assert_eq!(view.current(), 15);
        assert_eq!(view.bucket(StockLocation::Warehouse), 7);
        assert_eq!(view.bucket(StockLocation::Local), 8);
    }

    #[test]
    fn test_resolve_prefers_dedicated_record() {
        let products = vec![product("p1", 42, "Pen", 99)];
        let records = vec![record(42, 4, 10)];

        let resolved = resolve(&products, &records, &ProductRef::from(42)).unwrap();
        match &resolved {
            ResolvedStock::DedicatedRecord(r) => assert_eq!(r.product_id, 42),
            other => panic!("expected dedicated record, got {:?}", other),
        }
        // The record is authoritative even though the product row says 99
        assert_eq!(resolved.view(), StockView::new(4, 10));
    }

    #[test]
    fn test_resolve_tagged_rows() {
        // Two products "Pen" and "Pen (Warehouse)" with units 10 and 4,
        // no inventory record present.
        let products = vec![
            product("p1", 1, "Pen", 10),
            product("p2", 2, "Pen (Warehouse)", 4),
        ];

        let resolved = resolve(&products, &[], &ProductRef::from("p1")).unwrap();
        let view = resolved.view();
        assert_eq!(view.local, 10);
        assert_eq!(view.warehouse, 4);
        assert_eq!(view.current(), 14);

        // Resolving via the warehouse-tagged sibling lands on the same view
        let via_sibling = resolve(&products, &[], &ProductRef::from("p2")).unwrap();
        assert_eq!(via_sibling.view(), view);
    }

    #[test]
    fn test_resolve_absent_bucket_reads_zero() {
        let products = vec![product("p1", 1, "Pen", 10)];
        let resolved = resolve(&products, &[], &ProductRef::from("p1")).unwrap();
        assert_eq!(resolved.view(), StockView::new(0, 10));
    }

    #[test]
    fn test_resolve_unknown_product() {
        let err = resolve(&[], &[], &ProductRef::from("ghost")).unwrap_err();
        assert!(matches!(err, CoreError::ProductNotFound(_)));
    }

    #[test]
    fn test_resolved_identities_merge_siblings() {
        let products = vec![
            product("p1", 1, "Pen", 10),
            product("p2", 2, "Pen (Warehouse)", 4),
            product("p3", 3, "Notebook", 3),
        ];
        assert_eq!(resolved_identities(&products), vec!["Pen", "Notebook"]);
    }
}
