//! # Store Façade
//!
//! Composes the entity repositories, the reconciliation engine, and the
//! analytics view into one addressable state object.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  login                     session                        logout        │
//! │    │                          │                              │          │
//! │    ▼                          ▼                              ▼          │
//! │  Store::new(backend)   mutations & reads              store.clear()     │
//! │  store.load_all()      (confirm-then-apply)           (cache dropped,   │
//! │  (parallel fetch of                                    no remote call)  │
//! │   every collection)                                                     │
//! │                                                                         │
//! │  Constructed once per session and injected into whichever layer needs  │
//! │  it - never ambient global state.                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `load_all` fetches every collection concurrently; the fetches have no
//! ordering dependency. Every fetch runs to completion (no cancellation on
//! sibling failure), then the first failure, if any, surfaces.

use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone};
use tracing::info;

use shopsync_core::types::{
    Client, InventoryRecord, Meeting, Payment, Product, ProductExpiry, ProductRef, PurchaseReturn,
    Sale, SalesReturn, Supplier,
};
use shopsync_core::{drafts, validation, CoreError, StockLocation, ValidationError};
use shopsync_remote::RemoteBackend;

use crate::analytics::{self, DashboardAnalytics, ProductRevenue, RevenuePoint};
use crate::error::StoreResult;
use crate::inventory::StockEngine;
use crate::repository::EntityRepository;

// =============================================================================
// Store
// =============================================================================

/// The synchronized store: one repository per entity kind over a shared
/// remote backend.
///
/// Generic over the backend so production (REST) and tests (in-memory) use
/// identical store code.
pub struct Store<B: RemoteBackend> {
    pub products: EntityRepository<Product, B>,
    pub inventory: EntityRepository<InventoryRecord, B>,
    pub sales: EntityRepository<Sale, B>,
    pub clients: EntityRepository<Client, B>,
    pub payments: EntityRepository<Payment, B>,
    pub meetings: EntityRepository<Meeting, B>,
    pub expiries: EntityRepository<ProductExpiry, B>,
    pub suppliers: EntityRepository<Supplier, B>,
    pub sales_returns: EntityRepository<SalesReturn, B>,
    pub purchase_returns: EntityRepository<PurchaseReturn, B>,
}

impl<B: RemoteBackend> Store<B> {
    /// Builds an empty store over the backend. Call [`Store::load_all`]
    /// before reading.
    pub fn new(backend: B) -> Self {
        Self::with_backend(Arc::new(backend))
    }

    /// Builds a store over an already-shared backend.
    pub fn with_backend(backend: Arc<B>) -> Self {
        Store {
            products: EntityRepository::new(backend.clone()),
            inventory: EntityRepository::new(backend.clone()),
            sales: EntityRepository::new(backend.clone()),
            clients: EntityRepository::new(backend.clone()),
            payments: EntityRepository::new(backend.clone()),
            meetings: EntityRepository::new(backend.clone()),
            expiries: EntityRepository::new(backend.clone()),
            suppliers: EntityRepository::new(backend.clone()),
            sales_returns: EntityRepository::new(backend.clone()),
            purchase_returns: EntityRepository::new(backend),
        }
    }

    /// The stock reconciliation engine over this store's collections.
    pub fn stock(&self) -> StockEngine<'_, B> {
        StockEngine::new(&self.products, &self.inventory)
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Replaces every collection with a fresh remote fetch, concurrently.
    ///
    /// Fetches have no ordering dependency and all run to completion; the
    /// first failure (if any) surfaces afterwards. Collections that loaded
    /// before a sibling failed keep their fresh contents.
    pub async fn load_all(&self) -> StoreResult<()> {
        info!("Loading all collections from remote");

        let (products, inventory, sales, clients, payments, meetings, expiries, suppliers, sales_returns, purchase_returns) = tokio::join!(
            self.products.load_all(),
            self.inventory.load_all(),
            self.sales.load_all(),
            self.clients.load_all(),
            self.payments.load_all(),
            self.meetings.load_all(),
            self.expiries.load_all(),
            self.suppliers.load_all(),
            self.sales_returns.load_all(),
            self.purchase_returns.load_all(),
        );

        products?;
        inventory?;
        sales?;
        clients?;
        payments?;
        meetings?;
        expiries?;
        suppliers?;
        sales_returns?;
        purchase_returns?;
        Ok(())
    }

    /// Drops every cached collection (logout). No remote calls.
    pub async fn clear(&self) {
        self.products.clear().await;
        self.inventory.clear().await;
        self.sales.clear().await;
        self.clients.clear().await;
        self.payments.clear().await;
        self.meetings.clear().await;
        self.expiries.clear().await;
        self.suppliers.clear().await;
        self.sales_returns.clear().await;
        self.purchase_returns.clear().await;
        info!("Store cleared");
    }

    // =========================================================================
    // Sale Recording
    // =========================================================================

    /// Records a sale after the checks every sale form relies on.
    ///
    /// Validates quantity, price, and the client reference; resolves the
    /// product by either identity; and requires sufficient `local` stock via
    /// the reconciliation read path (warehouse stock must be transferred in
    /// before it can be sold). The total defaults to
    /// `quantity_sold × selling_price` unless the draft overrides it.
    pub async fn record_sale(&self, mut draft: drafts::SaleDraft) -> StoreResult<Sale> {
        validation::validate_quantity(draft.quantity_sold)?;
        validation::validate_selling_price(draft.selling_price)?;

        if draft.client_id.as_deref().map_or(true, str::is_empty) {
            validation::validate_client_name(draft.client_name.as_deref().unwrap_or(""))?;
        }

        let product_ref = draft.product_id.clone().ok_or(ValidationError::Required {
            field: "product".to_string(),
        })?;
        let product = self.resolve_product(&product_ref).await?;
        // Store the canonical id regardless of which identity the caller held
        draft.product_id = Some(product.id.clone());

        let key = ProductRef::Id(product.id.clone());
        let view = self.stock().view(&key).await?;
        if view.local < draft.quantity_sold {
            return Err(CoreError::InsufficientStock {
                location: StockLocation::Local,
                available: view.local,
                requested: draft.quantity_sold,
            }
            .into());
        }

        if draft.total_amount.is_none() {
            draft.total_amount = Some(draft.selling_price.multiply_quantity(draft.quantity_sold));
        }

        self.sales.create(&draft).await
    }

    /// Resolves a wire product reference that may be a string id or a
    /// stringified legacy numeric id.
    async fn resolve_product(&self, reference: &str) -> StoreResult<Product> {
        if let Some(product) = self
            .products
            .resolve_ref(&ProductRef::Id(reference.to_string()))
            .await
        {
            return Ok(product);
        }
        if let Ok(numeric) = reference.parse::<i64>() {
            if let Some(product) = self.products.resolve_ref(&ProductRef::Legacy(numeric)).await {
                return Ok(product);
            }
        }
        Err(CoreError::ProductNotFound(reference.to_string()).into())
    }

    // =========================================================================
    // Derived Views
    // =========================================================================

    /// The dashboard header block, with day boundaries in the local zone.
    pub async fn analytics(&self) -> DashboardAnalytics {
        self.analytics_at(&Local::now()).await
    }

    /// [`Store::analytics`] with an explicit clock, for tests and callers
    /// in a pinned zone.
    pub async fn analytics_at<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> DashboardAnalytics {
        let products = self.products.list().await;
        let records = self.inventory.list().await;
        let sales = self.sales.list().await;
        analytics::dashboard(&products, &records, &sales, now)
    }

    /// Daily revenue over a trailing 7- or 30-day window, zero-filled.
    pub async fn revenue_series(&self, days: u32) -> Vec<RevenuePoint> {
        self.revenue_series_at(days, &Local::now()).await
    }

    /// [`Store::revenue_series`] with an explicit clock.
    pub async fn revenue_series_at<Tz: TimeZone>(
        &self,
        days: u32,
        now: &DateTime<Tz>,
    ) -> Vec<RevenuePoint> {
        let sales = self.sales.list().await;
        analytics::revenue_series(&sales, days, now)
    }

    /// Top products by revenue (conventional top 5), grouped by resolved
    /// product identity.
    pub async fn top_products(&self) -> Vec<ProductRevenue> {
        let sales = self.sales.list().await;
        let products = self.products.list().await;
        analytics::top_products_default(&sales, &products)
    }

    /// Expiry batches due within the next `days` days.
    pub async fn expiring_products(&self, days: i64) -> Vec<ProductExpiry> {
        self.expiries
            .expiring_within(days, Local::now().date_naive())
            .await
    }

    /// Expiry batches already past their date.
    pub async fn expired_products(&self) -> Vec<ProductExpiry> {
        self.expiries.expired(Local::now().date_naive()).await
    }
}
