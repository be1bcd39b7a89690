//! # Domain Types
//!
//! Core domain types used throughout ShopSync.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │ InventoryRecord │   │      Sale       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (string)    │   │  product_id     │   │  id (string)    │       │
//! │  │  product_id     │   │  warehouse_stock│   │  sale_id (lgcy) │       │
//! │  │  name, price    │   │  local_stock    │   │  quantity_sold  │       │
//! │  │  units          │   │  current_stock  │   │  total_amount   │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  Client · Payment · Meeting · ProductExpiry · Supplier ·               │
//! │  SalesReturn · PurchaseReturn — simple collections sharing the         │
//! │  identical repository contract, distinguished by attribute sets.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Products carry two identifiers:
//! - `id`: string - stable primary key assigned by the remote
//! - `product_id`: legacy numeric id used by older call sites and by the
//!   inventory table; both must resolve to the same entity
//!
//! ## Normalization Contract
//! Every field here is STRICT. The loosely-typed wire shape (string-encoded
//! integers, float prices, absent fields) is normalized at the repository
//! boundary via [`crate::wire`] and never leaks past it.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::stock;

// =============================================================================
// Product Reference
// =============================================================================

/// A reference to a product by either of its two identities.
///
/// Call sites are inconsistent about which key they hold (string id from the
/// remote, legacy numeric id from older tables); both resolve to the same
/// entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(untagged)]
pub enum ProductRef {
    /// Stable string primary key.
    Id(String),
    /// Legacy numeric id.
    Legacy(i64),
}

impl std::fmt::Display for ProductRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProductRef::Id(id) => write!(f, "{}", id),
            ProductRef::Legacy(n) => write!(f, "#{}", n),
        }
    }
}

impl From<&str> for ProductRef {
    fn from(id: &str) -> Self {
        ProductRef::Id(id.to_string())
    }
}

impl From<i64> for ProductRef {
    fn from(n: i64) -> Self {
        ProductRef::Legacy(n)
    }
}

// =============================================================================
// Supplier Snapshot
// =============================================================================

/// Supplier details embedded on a product row.
///
/// A denormalized snapshot, not a reference: editing the supplier master does
/// not rewrite products that carry an older snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SupplierInfo {
    pub company_name: String,
    pub gst_number: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
}

impl SupplierInfo {
    /// True when every field is empty (the wire often sends all-empty
    /// supplier columns instead of omitting them).
    pub fn is_empty(&self) -> bool {
        self.company_name.is_empty()
            && self.gst_number.is_empty()
            && self.address.is_empty()
            && self.city.is_empty()
            && self.state.is_empty()
            && self.pincode.is_empty()
    }
}

// =============================================================================
// Product
// =============================================================================

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Product {
    /// Stable string primary key assigned by the remote.
    pub id: String,

    /// Legacy numeric id. Assigned by the remote, or derived from the
    /// trailing digits of `id` for old rows; `0` when underivable.
    pub product_id: i64,

    /// Display name. A `" (Warehouse)"` suffix marks this row as the
    /// warehouse-located stock of its base product (legacy encoding).
    pub name: String,

    /// Category label.
    pub category: String,

    /// Unit price.
    pub price: Money,

    /// On-hand unit count. String-encoded on the wire in some paths;
    /// always an integer here.
    pub units: i64,

    /// Threshold below which the product counts as low-stock.
    pub reorder_level: i64,

    /// Optional expiry date for perishable goods.
    #[ts(as = "Option<String>")]
    pub expiry_date: Option<NaiveDate>,

    /// Optional embedded supplier snapshot.
    pub supplier: Option<SupplierInfo>,

    /// When the row was created (absent on some legacy rows).
    #[ts(as = "Option<String>")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Product {
    /// True when this row is the warehouse-tagged sibling of a base product.
    #[inline]
    pub fn is_warehouse_row(&self) -> bool {
        stock::is_warehouse_name(&self.name)
    }

    /// The base product name with any warehouse tag stripped.
    #[inline]
    pub fn base_name(&self) -> &str {
        stock::base_name(&self.name)
    }

    /// True when either identity matches the given reference.
    pub fn matches(&self, key: &ProductRef) -> bool {
        match key {
            ProductRef::Id(id) => self.id == *id,
            ProductRef::Legacy(n) => self.product_id != 0 && self.product_id == *n,
        }
    }
}

// =============================================================================
// Inventory Record
// =============================================================================

/// Dedicated per-product stock record (current mode).
///
/// ## Invariants
/// - `current_stock == warehouse_stock + local_stock` after every operation
/// - both bucket fields are `>= 0` at all times
///
/// `current_stock` is always recomputed from the buckets, never set
/// independently — see [`InventoryRecord::with_buckets`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct InventoryRecord {
    /// Remote row id.
    pub id: String,

    /// The product this record tracks (one-to-one, legacy numeric key).
    pub product_id: i64,

    /// Denormalized product name for display.
    pub product_name: String,

    /// Sum of the two buckets. Derived, never authoritative on its own.
    pub current_stock: i64,

    /// Units in the warehouse bucket.
    pub warehouse_stock: i64,

    /// Units in the local shop bucket.
    pub local_stock: i64,

    /// Units reserved against open orders.
    pub reserved_stock: i64,

    /// Threshold below which the product counts as low-stock.
    pub reorder_level: i64,

    /// Refreshed on every stock mutation.
    #[ts(as = "Option<String>")]
    pub last_updated: Option<DateTime<Utc>>,
}

impl InventoryRecord {
    /// Units in the named bucket.
    #[inline]
    pub fn bucket(&self, location: stock::StockLocation) -> i64 {
        match location {
            stock::StockLocation::Warehouse => self.warehouse_stock,
            stock::StockLocation::Local => self.local_stock,
        }
    }

    /// Returns a copy with the given buckets and `current_stock` recomputed.
    pub fn with_buckets(&self, warehouse: i64, local: i64) -> Self {
        InventoryRecord {
            warehouse_stock: warehouse,
            local_stock: local,
            current_stock: warehouse + local,
            ..self.clone()
        }
    }

    /// Out of stock: nothing on hand in either bucket.
    #[inline]
    pub fn is_out_of_stock(&self) -> bool {
        self.current_stock == 0
    }

    /// Low stock: something on hand, but at or below the reorder level.
    #[inline]
    pub fn is_low_stock(&self) -> bool {
        self.current_stock > 0 && self.current_stock <= self.reorder_level
    }
}

// =============================================================================
// Sale
// =============================================================================

/// A recorded sale transaction.
///
/// Immutable once recorded: there is no partial update path, only deletion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Sale {
    /// Remote-assigned id.
    pub id: String,

    /// Legacy numeric id (client-generated fallback on old rows).
    pub sale_id: Option<i64>,

    /// Product sold, by string id when known.
    pub product_id: Option<String>,

    /// Denormalized product name (joined by the remote).
    pub product_name: Option<String>,

    /// Buying client, by id when known.
    pub client_id: Option<String>,

    /// Denormalized client name.
    pub client_name: Option<String>,

    /// Units sold.
    pub quantity_sold: i64,

    /// Per-unit selling price.
    pub selling_price: Money,

    /// Total amount. Equals `quantity_sold × selling_price` unless the
    /// remote explicitly recorded a different total.
    pub total_amount: Money,

    /// Free-form payment method label ("cash", "upi", ...).
    pub payment_method: Option<String>,

    pub notes: Option<String>,

    /// When the sale happened.
    #[ts(as = "String")]
    pub sale_date: DateTime<Utc>,
}

impl Sale {
    /// `quantity_sold × selling_price`, ignoring any remote override.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.selling_price.multiply_quantity(self.quantity_sold)
    }
}

// =============================================================================
// Client
// =============================================================================

/// A buying client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Client {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub pincode: Option<String>,
    pub gst_number: Option<String>,
    #[ts(as = "Option<String>")]
    pub created_at: Option<DateTime<Utc>>,
}

// =============================================================================
// Approval Status (Payments & Returns)
// =============================================================================

/// Lifecycle status shared by payments and returns.
///
/// ## Coercion
/// The remote may hold arbitrary strings in these columns. Loads never fail
/// on an unrecognized value; it coerces to [`ApprovalStatus::Pending`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalStatus {
    Pending,
    Approved,
    Completed,
    Rejected,
}

impl ApprovalStatus {
    /// Coerces an arbitrary wire string, falling back to `Pending`.
    pub fn coerce(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "approved" => ApprovalStatus::Approved,
            "completed" => ApprovalStatus::Completed,
            "rejected" => ApprovalStatus::Rejected,
            _ => ApprovalStatus::Pending,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ApprovalStatus::Pending => "pending",
            ApprovalStatus::Approved => "approved",
            ApprovalStatus::Completed => "completed",
            ApprovalStatus::Rejected => "rejected",
        }
    }
}

impl Default for ApprovalStatus {
    fn default() -> Self {
        ApprovalStatus::Pending
    }
}

impl std::fmt::Display for ApprovalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Payment
// =============================================================================

/// A payment received from a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Payment {
    pub id: String,
    pub client_id: Option<String>,
    /// Denormalized client name (joined by the remote).
    pub client_name: Option<String>,
    pub amount: Money,
    pub payment_method: Option<String>,
    pub reference_number: Option<String>,
    pub notes: Option<String>,
    pub status: ApprovalStatus,
    #[ts(as = "Option<String>")]
    pub payment_date: Option<DateTime<Utc>>,
}

// =============================================================================
// Meeting
// =============================================================================

/// How a client meeting is held. Unrecognized wire values coerce to `Call`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "kebab-case")]
pub enum MeetingKind {
    Call,
    Video,
    InPerson,
}

impl MeetingKind {
    pub fn coerce(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "video" => MeetingKind::Video,
            "in-person" | "in person" => MeetingKind::InPerson,
            _ => MeetingKind::Call,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MeetingKind::Call => "call",
            MeetingKind::Video => "video",
            MeetingKind::InPerson => "in-person",
        }
    }
}

/// Meeting lifecycle. Unrecognized wire values coerce to `Scheduled`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum MeetingStatus {
    Scheduled,
    Completed,
    Cancelled,
}

impl MeetingStatus {
    pub fn coerce(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "completed" => MeetingStatus::Completed,
            "cancelled" | "canceled" => MeetingStatus::Cancelled,
            _ => MeetingStatus::Scheduled,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MeetingStatus::Scheduled => "scheduled",
            MeetingStatus::Completed => "completed",
            MeetingStatus::Cancelled => "cancelled",
        }
    }
}

/// A scheduled client meeting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Meeting {
    pub id: String,
    pub client_id: Option<String>,
    pub client_name: String,
    pub title: String,
    #[ts(as = "String")]
    pub date: NaiveDate,
    /// Wall-clock time label as entered ("14:30"); never parsed.
    pub time: String,
    pub kind: MeetingKind,
    pub status: MeetingStatus,
    pub notes: Option<String>,
}

// =============================================================================
// Product Expiry
// =============================================================================

/// Expiry batch lifecycle. Unrecognized wire values coerce to `Active`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum ExpiryStatus {
    Active,
    Expired,
    Disposed,
}

impl ExpiryStatus {
    pub fn coerce(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "expired" => ExpiryStatus::Expired,
            "disposed" => ExpiryStatus::Disposed,
            _ => ExpiryStatus::Active,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ExpiryStatus::Active => "active",
            ExpiryStatus::Expired => "expired",
            ExpiryStatus::Disposed => "disposed",
        }
    }
}

/// An expiry-tracked batch of a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductExpiry {
    pub id: String,
    pub product_id: Option<String>,
    pub product_name: String,
    pub batch_number: Option<String>,
    pub quantity: i64,
    #[ts(as = "String")]
    pub expiry_date: NaiveDate,
    pub status: ExpiryStatus,
}

impl ProductExpiry {
    /// True when the batch has already expired as of `today`.
    #[inline]
    pub fn is_expired(&self, today: NaiveDate) -> bool {
        self.expiry_date < today
    }

    /// True when the batch expires within the next `days` days (inclusive),
    /// but has not expired yet.
    pub fn expires_within(&self, days: i64, today: NaiveDate) -> bool {
        let window_end = today + chrono::Duration::days(days);
        self.expiry_date >= today && self.expiry_date <= window_end
    }
}

// =============================================================================
// Supplier
// =============================================================================

/// A supplier master record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Supplier {
    pub id: String,
    pub company_name: String,
    pub contact_person: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub gst_number: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub pincode: Option<String>,
    #[ts(as = "Option<String>")]
    pub created_at: Option<DateTime<Utc>>,
}

// =============================================================================
// Returns
// =============================================================================

/// A return of sold goods from a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SalesReturn {
    pub id: String,
    pub sale_id: Option<String>,
    pub product_id: Option<String>,
    pub product_name: Option<String>,
    pub client_id: Option<String>,
    pub client_name: Option<String>,
    pub quantity_returned: i64,
    pub return_amount: Money,
    #[ts(as = "Option<String>")]
    pub return_date: Option<NaiveDate>,
    pub reason: Option<String>,
    pub status: ApprovalStatus,
}

/// A return of purchased goods to a supplier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PurchaseReturn {
    pub id: String,
    pub purchase_order_id: Option<String>,
    pub supplier_id: Option<String>,
    pub supplier_name: Option<String>,
    pub return_number: String,
    #[ts(as = "Option<String>")]
    pub return_date: Option<NaiveDate>,
    pub total_amount: Money,
    pub reason: Option<String>,
    pub status: ApprovalStatus,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn record(warehouse: i64, local: i64, reorder: i64) -> InventoryRecord {
        InventoryRecord {
            id: "inv-1".to_string(),
            product_id: 1,
            product_name: "Pen".to_string(),
            current_stock: warehouse + local,
            warehouse_stock: warehouse,
            local_stock: local,
            reserved_stock: 0,
            reorder_level: reorder,
            last_updated: None,
        }
    }

    #[test]
    fn test_with_buckets_recomputes_current() {
        let rec = record(10, 5, 5);
        let moved = rec.with_buckets(7, 8);
        assert_eq!(moved.warehouse_stock, 7);
        assert_eq!(moved.local_stock, 8);
        assert_eq!(moved.current_stock, 15);
    }

    #[test]
    fn test_stock_level_classification() {
        assert!(record(0, 0, 5).is_out_of_stock());
        assert!(!record(0, 0, 5).is_low_stock());

        let low = record(0, 3, 5);
        assert!(low.is_low_stock());
        assert!(!low.is_out_of_stock());

        let healthy = record(4, 4, 5);
        assert!(!healthy.is_low_stock());
        assert!(!healthy.is_out_of_stock());
    }

    #[test]
    fn test_approval_status_coercion() {
        assert_eq!(ApprovalStatus::coerce("approved"), ApprovalStatus::Approved);
        assert_eq!(ApprovalStatus::coerce("COMPLETED"), ApprovalStatus::Completed);
        assert_eq!(ApprovalStatus::coerce("rejected"), ApprovalStatus::Rejected);
        assert_eq!(ApprovalStatus::coerce("whatever"), ApprovalStatus::Pending);
        assert_eq!(ApprovalStatus::coerce(""), ApprovalStatus::Pending);
    }

    #[test]
    fn test_meeting_coercion() {
        assert_eq!(MeetingKind::coerce("video"), MeetingKind::Video);
        assert_eq!(MeetingKind::coerce("in-person"), MeetingKind::InPerson);
        assert_eq!(MeetingKind::coerce("carrier pigeon"), MeetingKind::Call);

        assert_eq!(MeetingStatus::coerce("cancelled"), MeetingStatus::Cancelled);
        assert_eq!(MeetingStatus::coerce("canceled"), MeetingStatus::Cancelled);
        assert_eq!(MeetingStatus::coerce("??"), MeetingStatus::Scheduled);
    }

    #[test]
    fn test_expiry_queries() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
        let batch = ProductExpiry {
            id: "exp-1".to_string(),
            product_id: None,
            product_name: "Milk".to_string(),
            batch_number: None,
            quantity: 10,
            expiry_date: NaiveDate::from_ymd_opt(2025, 6, 20).unwrap(),
            status: ExpiryStatus::Active,
        };

        assert!(!batch.is_expired(today));
        assert!(batch.expires_within(7, today));
        assert!(!batch.expires_within(3, today));

        let past = NaiveDate::from_ymd_opt(2025, 7, 1).unwrap();
        assert!(batch.is_expired(past));
        assert!(!batch.expires_within(7, past));
    }

    #[test]
    fn test_product_ref_matching() {
        let product = Product {
            id: "product-42".to_string(),
            product_id: 42,
            name: "Pen".to_string(),
            category: "Stationery".to_string(),
            price: Money::from_cents(1000),
            units: 10,
            reorder_level: 5,
            expiry_date: None,
            supplier: None,
            created_at: None,
        };

        assert!(product.matches(&ProductRef::from("product-42")));
        assert!(product.matches(&ProductRef::from(42)));
        assert!(!product.matches(&ProductRef::from(7)));

        // product_id == 0 means "no legacy id"; it must never match Legacy(0)
        let unkeyed = Product {
            product_id: 0,
            ..product
        };
        assert!(!unkeyed.matches(&ProductRef::from(0)));
    }

    #[test]
    fn test_sale_line_total() {
        let sale = Sale {
            id: "s1".to_string(),
            sale_id: None,
            product_id: None,
            product_name: None,
            client_id: None,
            client_name: None,
            quantity_sold: 3,
            selling_price: Money::from_cents(250),
            total_amount: Money::from_cents(750),
            payment_method: None,
            notes: None,
            sale_date: Utc::now(),
        };
        assert_eq!(sale.line_total(), Money::from_cents(750));
    }
}
