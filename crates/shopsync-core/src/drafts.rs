//! # Drafts & Patches
//!
//! Typed create and update payloads for every entity.
//!
//! ## Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Draft  = entity minus id and server-assigned timestamps.              │
//! │           Serialized with WIRE field names (product_name, not name).   │
//! │                                                                         │
//! │  Patch  = partial update; every field Option, None fields are          │
//! │           omitted from the payload entirely (never sent as null).      │
//! │                                                                         │
//! │  Sales have NO patch type: a recorded sale is immutable except for     │
//! │  deletion.                                                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Monetary fields serialize as wire decimals and product `units` as a
//! string, matching the column shapes the remote stores (see [`crate::wire`]).

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use ts_rs::TS;

use crate::money::Money;
use crate::types::{ApprovalStatus, ExpiryStatus, MeetingKind, MeetingStatus, SupplierInfo};
use crate::{DEFAULT_CATEGORY, DEFAULT_REORDER_LEVEL};

// =============================================================================
// Product
// =============================================================================

/// Create payload for a product.
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
pub struct ProductDraft {
    #[serde(rename = "product_name")]
    pub name: String,

    pub category: String,

    #[serde(serialize_with = "crate::wire::money_decimal::serialize")]
    pub price: Money,

    /// Stored as text on the wire.
    #[serde(serialize_with = "crate::wire::int_string::serialize")]
    pub units: i64,

    pub reorder_level: i64,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(as = "Option<String>")]
    pub expiry_date: Option<NaiveDate>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub supplier: Option<SupplierInfo>,
}

impl ProductDraft {
    /// A draft with the default category and reorder level.
    pub fn new(name: impl Into<String>, price: Money, units: i64) -> Self {
        ProductDraft {
            name: name.into(),
            category: DEFAULT_CATEGORY.to_string(),
            price,
            units,
            reorder_level: DEFAULT_REORDER_LEVEL,
            expiry_date: None,
            supplier: None,
        }
    }
}

/// Partial update for a product.
#[derive(Debug, Clone, Default, Serialize, TS)]
#[ts(export)]
pub struct ProductPatch {
    #[serde(rename = "product_name", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "crate::wire::money_decimal_opt::serialize"
    )]
    pub price: Option<Money>,

    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "crate::wire::int_string_opt::serialize"
    )]
    pub units: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub reorder_level: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(as = "Option<String>")]
    pub expiry_date: Option<NaiveDate>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub supplier: Option<SupplierInfo>,
}

impl ProductPatch {
    /// A patch that only adjusts the unit count (legacy-mode stock writes).
    pub fn units(units: i64) -> Self {
        ProductPatch {
            units: Some(units),
            ..ProductPatch::default()
        }
    }
}

// =============================================================================
// Inventory
// =============================================================================

/// Create payload for an inventory record.
///
/// Constructed only through [`InventoryDraft::new`], which derives
/// `current_stock` from the buckets so the sum invariant holds from birth.
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
pub struct InventoryDraft {
    product_id: i64,
    product_name: String,
    current_stock: i64,
    warehouse_stock: i64,
    local_stock: i64,
    reserved_stock: i64,
    reorder_level: i64,
}

impl InventoryDraft {
    pub fn new(
        product_id: i64,
        product_name: impl Into<String>,
        warehouse_stock: i64,
        local_stock: i64,
        reorder_level: i64,
    ) -> Self {
        InventoryDraft {
            product_id,
            product_name: product_name.into(),
            current_stock: warehouse_stock + local_stock,
            warehouse_stock,
            local_stock,
            reserved_stock: 0,
            reorder_level,
        }
    }
}

/// Bucket update for an inventory record.
///
/// Constructed only through [`InventoryPatch::buckets`]: `current_stock` is
/// always recomputed from the buckets, never set independently.
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
pub struct InventoryPatch {
    warehouse_stock: i64,
    local_stock: i64,
    current_stock: i64,
    #[ts(as = "String")]
    last_updated: DateTime<Utc>,
}

impl InventoryPatch {
    pub fn buckets(warehouse_stock: i64, local_stock: i64, now: DateTime<Utc>) -> Self {
        InventoryPatch {
            warehouse_stock,
            local_stock,
            current_stock: warehouse_stock + local_stock,
            last_updated: now,
        }
    }
}

// =============================================================================
// Sale
// =============================================================================

/// Create payload for a sale.
///
/// `total_amount` is normally left `None` and computed as
/// `quantity_sold × selling_price` by the checked record path; a caller may
/// override it explicitly (negotiated totals).
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
pub struct SaleDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_name: Option<String>,

    pub quantity_sold: i64,

    #[serde(serialize_with = "crate::wire::money_decimal::serialize")]
    pub selling_price: Money,

    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "crate::wire::money_decimal_opt::serialize"
    )]
    pub total_amount: Option<Money>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(as = "Option<String>")]
    pub sale_date: Option<DateTime<Utc>>,
}

impl SaleDraft {
    pub fn new(product_id: impl Into<String>, quantity_sold: i64, selling_price: Money) -> Self {
        SaleDraft {
            product_id: Some(product_id.into()),
            client_id: None,
            client_name: None,
            quantity_sold,
            selling_price,
            total_amount: None,
            payment_method: None,
            notes: None,
            sale_date: None,
        }
    }
}

// =============================================================================
// Client
// =============================================================================

/// Create payload for a client.
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
pub struct ClientDraft {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pincode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gst_number: Option<String>,
}

impl ClientDraft {
    pub fn new(name: impl Into<String>) -> Self {
        ClientDraft {
            name: name.into(),
            email: None,
            phone: None,
            address: None,
            city: None,
            state: None,
            pincode: None,
            gst_number: None,
        }
    }
}

/// Partial update for a client.
#[derive(Debug, Clone, Default, Serialize, TS)]
#[ts(export)]
pub struct ClientPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pincode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gst_number: Option<String>,
}

// =============================================================================
// Payment
// =============================================================================

/// Create payload for a payment.
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
pub struct PaymentDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,

    #[serde(serialize_with = "crate::wire::money_decimal::serialize")]
    pub amount: Money,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_number: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    pub status: ApprovalStatus,
}

/// Partial update for a payment.
#[derive(Debug, Clone, Default, Serialize, TS)]
#[ts(export)]
pub struct PaymentPatch {
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "crate::wire::money_decimal_opt::serialize"
    )]
    pub amount: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ApprovalStatus>,
}

// =============================================================================
// Meeting
// =============================================================================

/// Create payload for a meeting.
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
pub struct MeetingDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,

    pub client_name: String,

    pub title: String,

    #[ts(as = "String")]
    pub date: NaiveDate,

    pub time: String,

    /// Wire column is `type`.
    #[serde(rename = "type")]
    pub kind: MeetingKind,

    pub status: MeetingStatus,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Partial update for a meeting.
#[derive(Debug, Clone, Default, Serialize, TS)]
#[ts(export)]
pub struct MeetingPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(as = "Option<String>")]
    pub date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<MeetingKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<MeetingStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl MeetingPatch {
    /// A patch that only changes the lifecycle status.
    pub fn status(status: MeetingStatus) -> Self {
        MeetingPatch {
            status: Some(status),
            ..MeetingPatch::default()
        }
    }
}

// =============================================================================
// Product Expiry
// =============================================================================

/// Create payload for an expiry batch.
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
pub struct ExpiryDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,

    pub product_name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch_number: Option<String>,

    pub quantity: i64,

    #[ts(as = "String")]
    pub expiry_date: NaiveDate,

    pub status: ExpiryStatus,
}

/// Partial update for an expiry batch.
#[derive(Debug, Clone, Default, Serialize, TS)]
#[ts(export)]
pub struct ExpiryPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(as = "Option<String>")]
    pub expiry_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ExpiryStatus>,
}

// =============================================================================
// Supplier
// =============================================================================

/// Create payload for a supplier.
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
pub struct SupplierDraft {
    pub company_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_person: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gst_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pincode: Option<String>,
}

/// Partial update for a supplier.
#[derive(Debug, Clone, Default, Serialize, TS)]
#[ts(export)]
pub struct SupplierPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_person: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gst_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pincode: Option<String>,
}

// =============================================================================
// Returns
// =============================================================================

/// Create payload for a sales return.
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
pub struct SalesReturnDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sale_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,

    pub quantity_returned: i64,

    #[serde(serialize_with = "crate::wire::money_decimal::serialize")]
    pub return_amount: Money,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(as = "Option<String>")]
    pub return_date: Option<NaiveDate>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    pub status: ApprovalStatus,
}

/// Partial update for a sales return.
#[derive(Debug, Clone, Default, Serialize, TS)]
#[ts(export)]
pub struct SalesReturnPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity_returned: Option<i64>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "crate::wire::money_decimal_opt::serialize"
    )]
    pub return_amount: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ApprovalStatus>,
}

/// Create payload for a purchase return.
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
pub struct PurchaseReturnDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purchase_order_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supplier_id: Option<String>,

    pub return_number: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(as = "Option<String>")]
    pub return_date: Option<NaiveDate>,

    #[serde(serialize_with = "crate::wire::money_decimal::serialize")]
    pub total_amount: Money,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    pub status: ApprovalStatus,
}

/// Partial update for a purchase return.
#[derive(Debug, Clone, Default, Serialize, TS)]
#[ts(export)]
pub struct PurchaseReturnPatch {
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "crate::wire::money_decimal_opt::serialize"
    )]
    pub total_amount: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ApprovalStatus>,
}

// =============================================================================
// Unit Tests
// =============================================================================
