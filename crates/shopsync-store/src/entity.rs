//! # Entity Contract & Wire Normalization
//!
//! Binds each domain type to its remote collection and defines how its
//! loosely-typed wire records normalize into the strict internal shape.
//!
//! ## The Boundary
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Remote record (serde_json::Value)                                      │
//! │    { "id": "p1", "product_name": "Pen", "units": "12",                  │
//! │      "price": 10.5, "product_id": "42", ... }                           │
//! │       │                                                                 │
//! │       ▼  Entity::decode  (THIS MODULE - runs once per record)           │
//! │                                                                         │
//! │  Strict domain value (shopsync_core::types)                             │
//! │    Product { id, product_id: 42, units: 12,                             │
//! │              price: Money(1050), ... }                                  │
//! │                                                                         │
//! │  Nothing past this boundary ever sees a wire shape.                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Decode Policy
//! - A record with no usable id is malformed (skipped during loads).
//! - Status strings coerce to their documented fallback, never fail.
//! - Numbers accept string encodings; money accepts wire decimals.
//! - Joined sub-objects (`products.product_name`, `clients.name`) backfill
//!   denormalized fields.

use serde::Serialize;
use serde_json::Value;

use shopsync_core::{
    drafts, types, wire, ApprovalStatus, CoreError, CoreResult, ExpiryStatus, MeetingKind,
    MeetingStatus, SupplierInfo, DEFAULT_CATEGORY, DEFAULT_REORDER_LEVEL,
};
use shopsync_remote::Collection;

// =============================================================================
// Entity Trait
// =============================================================================

/// A domain type stored in one remote collection.
///
/// `Draft` is the create payload (entity minus id and server-assigned
/// timestamps). Decoding is the single normalization point for the
/// collection's wire records.
pub trait Entity: Clone + Send + Sync + 'static {
    /// The remote collection backing this entity kind.
    const COLLECTION: Collection;

    /// Create payload type, serialized with wire field names.
    type Draft: Serialize + Send + Sync;

    /// The entity's primary identifier.
    fn entity_id(&self) -> &str;

    /// Normalizes one wire record.
    fn decode(record: &Value) -> CoreResult<Self>;
}

/// An entity kind with a partial-update path.
///
/// Sales deliberately do NOT implement this: a recorded sale is immutable
/// except for deletion.
pub trait Patchable: Entity {
    /// Partial-update payload type; `None` fields are omitted entirely.
    type Patch: Serialize + Send + Sync;
}

// =============================================================================
// Decode Helpers
// =============================================================================

/// The record's id, or a MalformedRecord error naming the collection.
fn require_id(record: &Value, collection: Collection) -> CoreResult<String> {
    wire::str_field(record, "id")
        .ok_or_else(|| CoreError::malformed(collection.as_str(), "missing id"))
}

/// Supplier snapshot from either shape: flattened `supplier_*` columns
/// (legacy rows) or a nested `supplier` object (rows our drafts wrote).
fn supplier_snapshot(record: &Value) -> Option<SupplierInfo> {
    if let Some(nested) = record.get("supplier") {
        if nested.is_object() {
            let info = SupplierInfo {
                company_name: wire::str_field(nested, "company_name").unwrap_or_default(),
                gst_number: wire::str_field(nested, "gst_number").unwrap_or_default(),
                address: wire::str_field(nested, "address").unwrap_or_default(),
                city: wire::str_field(nested, "city").unwrap_or_default(),
                state: wire::str_field(nested, "state").unwrap_or_default(),
                pincode: wire::str_field(nested, "pincode").unwrap_or_default(),
            };
            if !info.is_empty() {
                return Some(info);
            }
        }
    }

    let info = SupplierInfo {
        company_name: wire::str_field(record, "supplier_company_name").unwrap_or_default(),
        gst_number: wire::str_field(record, "supplier_gst_number").unwrap_or_default(),
        address: wire::str_field(record, "supplier_address").unwrap_or_default(),
        city: wire::str_field(record, "supplier_city").unwrap_or_default(),
        state: wire::str_field(record, "supplier_state").unwrap_or_default(),
        pincode: wire::str_field(record, "supplier_pincode").unwrap_or_default(),
    };
    if info.is_empty() {
        None
    } else {
        Some(info)
    }
}

/// Coerced status field: absent or unrecognized values fall back.
fn status_field<T>(record: &Value, coerce: impl Fn(&str) -> T, fallback: T) -> T {
    match wire::str_field(record, "status") {
        Some(raw) => coerce(&raw),
        None => fallback,
    }
}

// =============================================================================
// Product
// =============================================================================

impl Entity for types::Product {
    const COLLECTION: Collection = Collection::Products;
    type Draft = drafts::ProductDraft;

    fn entity_id(&self) -> &str {
        &self.id
    }

    fn decode(record: &Value) -> CoreResult<Self> {
        let id = require_id(record, Self::COLLECTION)?;

        let name = wire::str_field(record, "product_name")
            .or_else(|| wire::str_field(record, "name"))
            .ok_or_else(|| CoreError::malformed("products", "missing product_name"))?;

        // Legacy numeric id: the column when present, else derivable from
        // ids shaped like "product-42"
        let product_id = wire::int_field(record, "product_id")
            .or_else(|| wire::trailing_digits(&id))
            .unwrap_or(0);

        Ok(types::Product {
            id,
            product_id,
            name,
            category: wire::str_field(record, "category")
                .unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
            price: wire::money_field(record, "price").unwrap_or_default(),
            units: wire::int_field(record, "units").unwrap_or(0),
            reorder_level: wire::int_field(record, "reorder_level")
                .unwrap_or(DEFAULT_REORDER_LEVEL),
            expiry_date: wire::date_field(record, "expiry_date"),
            supplier: supplier_snapshot(record),
            created_at: wire::datetime_field(record, "created_at"),
        })
    }
}

impl Patchable for types::Product {
    type Patch = drafts::ProductPatch;
}

// =============================================================================
// Inventory Record
// =============================================================================

impl Entity for types::InventoryRecord {
    const COLLECTION: Collection = Collection::Inventory;
    type Draft = drafts::InventoryDraft;

    fn entity_id(&self) -> &str {
        &self.id
    }

    fn decode(record: &Value) -> CoreResult<Self> {
        let id = require_id(record, Self::COLLECTION)?;
        let product_id = wire::int_field(record, "product_id")
            .ok_or_else(|| CoreError::malformed("inventory", "missing product_id"))?;

        let warehouse_stock = wire::int_field(record, "warehouse_stock").unwrap_or(0);
        // Rows written before bucket tracking carry only current_stock; it
        // seeds the local bucket
        let local_stock = wire::int_field(record, "local_stock")
            .or_else(|| wire::int_field(record, "current_stock").map(|c| c - warehouse_stock))
            .unwrap_or(0);

        Ok(types::InventoryRecord {
            id,
            product_id,
            product_name: wire::str_field(record, "product_name")
                .or_else(|| wire::nested_str(record, &["products", "product_name"]))
                .unwrap_or_default(),
            // The sum invariant is enforced at decode; a wire current_stock
            // that disagrees with the buckets loses
            current_stock: warehouse_stock + local_stock,
            warehouse_stock,
            local_stock,
            reserved_stock: wire::int_field(record, "reserved_stock").unwrap_or(0),
            reorder_level: wire::int_field(record, "reorder_level")
                .unwrap_or(DEFAULT_REORDER_LEVEL),
            last_updated: wire::datetime_field(record, "last_updated"),
        })
    }
}

impl Patchable for types::InventoryRecord {
    type Patch = drafts::InventoryPatch;
}

// =============================================================================
// Sale
// =============================================================================

impl Entity for types::Sale {
    const COLLECTION: Collection = Collection::Sales;
    type Draft = drafts::SaleDraft;

    fn entity_id(&self) -> &str {
        &self.id
    }

    fn decode(record: &Value) -> CoreResult<Self> {
        let id = require_id(record, Self::COLLECTION)?;

        let quantity_sold = wire::int_field(record, "quantity_sold").unwrap_or(0);
        let selling_price = wire::money_field(record, "selling_price").unwrap_or_default();
        // Remote total wins when recorded; otherwise it is the line total
        let total_amount = wire::money_field(record, "total_amount")
            .unwrap_or_else(|| selling_price.multiply_quantity(quantity_sold));

        let sale_date = wire::datetime_field(record, "sale_date")
            .or_else(|| wire::datetime_field(record, "created_at"))
            .unwrap_or(chrono::DateTime::UNIX_EPOCH);

        Ok(types::Sale {
            id,
            sale_id: wire::int_field(record, "sale_id"),
            product_id: wire::str_field(record, "product_id"),
            product_name: wire::str_field(record, "product_name")
                .or_else(|| wire::nested_str(record, &["products", "product_name"])),
            client_id: wire::str_field(record, "client_id"),
            client_name: wire::str_field(record, "client_name")
                .or_else(|| wire::nested_str(record, &["clients", "name"])),
            quantity_sold,
            selling_price,
            total_amount,
            payment_method: wire::str_field(record, "payment_method"),
            notes: wire::str_field(record, "notes"),
            sale_date,
        })
    }
}

// =============================================================================
// Client
// =============================================================================

impl Entity for types::Client {
    const COLLECTION: Collection = Collection::Clients;
    type Draft = drafts::ClientDraft;

    fn entity_id(&self) -> &str {
        &self.id
    }

    fn decode(record: &Value) -> CoreResult<Self> {
        let id = require_id(record, Self::COLLECTION)?;
        let name = wire::str_field(record, "name")
            .ok_or_else(|| CoreError::malformed("clients", "missing name"))?;

        Ok(types::Client {
            id,
            name,
            email: wire::str_field(record, "email"),
            phone: wire::str_field(record, "phone"),
            address: wire::str_field(record, "address"),
            city: wire::str_field(record, "city"),
            state: wire::str_field(record, "state"),
            pincode: wire::str_field(record, "pincode"),
            gst_number: wire::str_field(record, "gst_number"),
            created_at: wire::datetime_field(record, "created_at"),
        })
    }
}

impl Patchable for types::Client {
    type Patch = drafts::ClientPatch;
}

// =============================================================================
// Payment
// =============================================================================

impl Entity for types::Payment {
    const COLLECTION: Collection = Collection::Payments;
    type Draft = drafts::PaymentDraft;

    fn entity_id(&self) -> &str {
        &self.id
    }

    fn decode(record: &Value) -> CoreResult<Self> {
        let id = require_id(record, Self::COLLECTION)?;

        Ok(types::Payment {
            id,
            client_id: wire::str_field(record, "client_id"),
            client_name: wire::str_field(record, "client_name")
                .or_else(|| wire::nested_str(record, &["clients", "name"])),
            amount: wire::money_field(record, "amount").unwrap_or_default(),
            payment_method: wire::str_field(record, "payment_method"),
            reference_number: wire::str_field(record, "reference_number"),
            notes: wire::str_field(record, "notes"),
            status: status_field(record, ApprovalStatus::coerce, ApprovalStatus::Pending),
            payment_date: wire::datetime_field(record, "payment_date")
                .or_else(|| wire::datetime_field(record, "created_at")),
        })
    }
}

impl Patchable for types::Payment {
    type Patch = drafts::PaymentPatch;
}

// =============================================================================
// Meeting
// =============================================================================

impl Entity for types::Meeting {
    const COLLECTION: Collection = Collection::Meetings;
    type Draft = drafts::MeetingDraft;

    fn entity_id(&self) -> &str {
        &self.id
    }

    fn decode(record: &Value) -> CoreResult<Self> {
        let id = require_id(record, Self::COLLECTION)?;
        let date = wire::date_field(record, "date")
            .ok_or_else(|| CoreError::malformed("meetings", "missing date"))?;

        Ok(types::Meeting {
            id,
            client_id: wire::str_field(record, "client_id"),
            client_name: wire::str_field(record, "client_name")
                .or_else(|| wire::nested_str(record, &["clients", "name"]))
                .unwrap_or_default(),
            title: wire::str_field(record, "title").unwrap_or_default(),
            date,
            time: wire::str_field(record, "time").unwrap_or_default(),
            kind: match wire::str_field(record, "type") {
                Some(raw) => MeetingKind::coerce(&raw),
                None => MeetingKind::Call,
            },
            status: status_field(record, MeetingStatus::coerce, MeetingStatus::Scheduled),
            notes: wire::str_field(record, "notes"),
        })
    }
}

impl Patchable for types::Meeting {
    type Patch = drafts::MeetingPatch;
}

// =============================================================================
// Product Expiry
// =============================================================================

impl Entity for types::ProductExpiry {
    const COLLECTION: Collection = Collection::ProductExpiries;
    type Draft = drafts::ExpiryDraft;

    fn entity_id(&self) -> &str {
        &self.id
    }

    fn decode(record: &Value) -> CoreResult<Self> {
        let id = require_id(record, Self::COLLECTION)?;
        let expiry_date = wire::date_field(record, "expiry_date")
            .ok_or_else(|| CoreError::malformed("product_expiries", "missing expiry_date"))?;

        Ok(types::ProductExpiry {
            id,
            product_id: wire::str_field(record, "product_id"),
            product_name: wire::str_field(record, "product_name")
                .or_else(|| wire::nested_str(record, &["products", "product_name"]))
                .unwrap_or_default(),
            batch_number: wire::str_field(record, "batch_number"),
            quantity: wire::int_field(record, "quantity").unwrap_or(0),
            expiry_date,
            status: status_field(record, ExpiryStatus::coerce, ExpiryStatus::Active),
        })
    }
}

impl Patchable for types::ProductExpiry {
    type Patch = drafts::ExpiryPatch;
}

// =============================================================================
// Supplier
// =============================================================================

impl Entity for types::Supplier {
    const COLLECTION: Collection = Collection::Suppliers;
    type Draft = drafts::SupplierDraft;

    fn entity_id(&self) -> &str {
        &self.id
    }

    fn decode(record: &Value) -> CoreResult<Self> {
        // Legacy rows key on supplier_id instead of id
        let id = wire::str_field(record, "id")
            .or_else(|| wire::str_field(record, "supplier_id"))
            .ok_or_else(|| CoreError::malformed("suppliers", "missing id"))?;

        let company_name = wire::str_field(record, "company_name")
            .or_else(|| wire::str_field(record, "supplier_name"))
            .ok_or_else(|| CoreError::malformed("suppliers", "missing company_name"))?;

        Ok(types::Supplier {
            id,
            company_name,
            contact_person: wire::str_field(record, "contact_person"),
            phone: wire::str_field(record, "phone"),
            email: wire::str_field(record, "email"),
            gst_number: wire::str_field(record, "gst_number"),
            address: wire::str_field(record, "address"),
            city: wire::str_field(record, "city"),
            state: wire::str_field(record, "state"),
            pincode: wire::str_field(record, "pincode"),
            created_at: wire::datetime_field(record, "created_at"),
        })
    }
}

impl Patchable for types::Supplier {
    type Patch = drafts::SupplierPatch;
}

// =============================================================================
// Returns
// =============================================================================

impl Entity for types::SalesReturn {
    const COLLECTION: Collection = Collection::SalesReturns;
    type Draft = drafts::SalesReturnDraft;

    fn entity_id(&self) -> &str {
        &self.id
    }

    fn decode(record: &Value) -> CoreResult<Self> {
        let id = require_id(record, Self::COLLECTION)?;

        Ok(types::SalesReturn {
            id,
            sale_id: wire::str_field(record, "sale_id")
                .or_else(|| wire::nested_str(record, &["sales", "id"])),
            product_id: wire::str_field(record, "product_id"),
            product_name: wire::str_field(record, "product_name")
                .or_else(|| wire::nested_str(record, &["products", "product_name"])),
            client_id: wire::str_field(record, "client_id"),
            client_name: wire::str_field(record, "client_name")
                .or_else(|| wire::nested_str(record, &["clients", "name"])),
            quantity_returned: wire::int_field(record, "quantity_returned").unwrap_or(0),
            return_amount: wire::money_field(record, "return_amount").unwrap_or_default(),
            return_date: wire::date_field(record, "return_date"),
            reason: wire::str_field(record, "reason"),
            status: status_field(record, ApprovalStatus::coerce, ApprovalStatus::Pending),
        })
    }
}

impl Patchable for types::SalesReturn {
    type Patch = drafts::SalesReturnPatch;
}

impl Entity for types::PurchaseReturn {
    const COLLECTION: Collection = Collection::PurchaseReturns;
    type Draft = drafts::PurchaseReturnDraft;

    fn entity_id(&self) -> &str {
        &self.id
    }

    fn decode(record: &Value) -> CoreResult<Self> {
        let id = require_id(record, Self::COLLECTION)?;

        Ok(types::PurchaseReturn {
            id,
            purchase_order_id: wire::str_field(record, "purchase_order_id")
                .or_else(|| wire::nested_str(record, &["purchase_orders", "order_number"])),
            supplier_id: wire::str_field(record, "supplier_id"),
            supplier_name: wire::str_field(record, "supplier_name")
                .or_else(|| wire::nested_str(record, &["suppliers", "supplier_name"])),
            return_number: wire::str_field(record, "return_number").unwrap_or_default(),
            return_date: wire::date_field(record, "return_date"),
            total_amount: wire::money_field(record, "total_amount").unwrap_or_default(),
            reason: wire::str_field(record, "reason"),
            status: status_field(record, ApprovalStatus::coerce, ApprovalStatus::Pending),
        })
    }
}

impl Patchable for types::PurchaseReturn {
    type Patch = drafts::PurchaseReturnPatch;
}

// =============================================================================
// Unit Tests
// =============================================================================
