//! End-to-end store tests against the in-memory backend.
//!
//! These drive the full path the dashboard uses: seed wire-shaped records,
//! `load_all`, mutate through the store, and assert on what `list()` and the
//! derived views report afterwards.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::json;

use shopsync_core::drafts::{ClientDraft, ProductDraft, SaleDraft};
use shopsync_core::{ApprovalStatus, Money, ProductRef, StockLocation};
use shopsync_remote::{Collection, MemoryBackend, RemoteError};
use shopsync_store::{Store, StoreError};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}

fn store_over(backend: Arc<MemoryBackend>) -> Store<MemoryBackend> {
    init_tracing();
    Store::with_backend(backend)
}

/// Product row in the legacy wire shape (string units, float price).
fn product_row(id: &str, product_id: i64, name: &str, price: f64, units: &str) -> serde_json::Value {
    json!({
        "id": id,
        "product_id": product_id,
        "product_name": name,
        "category": "Stationery",
        "price": price,
        "units": units,
        "reorder_level": 5,
    })
}

fn inventory_row(product_id: i64, warehouse: i64, local: i64, reorder: i64) -> serde_json::Value {
    json!({
        "id": format!("inv-{}", product_id),
        "product_id": product_id,
        "product_name": "Pen",
        "current_stock": warehouse + local,
        "warehouse_stock": warehouse,
        "local_stock": local,
        "reserved_stock": 0,
        "reorder_level": reorder,
    })
}

fn test_now() -> DateTime<Utc> {
    "2025-06-15T18:00:00Z".parse().unwrap()
}

// =============================================================================
// Load / Clear Lifecycle
// =============================================================================

#[tokio::test]
async fn load_all_populates_every_collection_and_clear_empties_them() {
    let backend = Arc::new(MemoryBackend::new());
    backend
        .seed(
            Collection::Products,
            vec![product_row("p1", 1, "Pen", 10.0, "12")],
        )
        .await;
    backend
        .seed(Collection::Clients, vec![json!({"id": "c1", "name": "Acme"})])
        .await;
    backend
        .seed(
            Collection::Payments,
            vec![json!({"id": "pay1", "amount": 99.5, "status": "completed"})],
        )
        .await;

    let store = store_over(backend);
    store.load_all().await.unwrap();

    assert_eq!(store.products.count().await, 1);
    assert_eq!(store.clients.count().await, 1);
    assert_eq!(store.payments.count().await, 1);
    assert_eq!(store.sales.count().await, 0);

    // Wire normalization happened at the boundary
    let product = store.products.get("p1").await.unwrap();
    assert_eq!(product.units, 12);
    assert_eq!(product.price, Money::from_cents(1000));

    store.clear().await;
    assert_eq!(store.products.count().await, 0);
    assert_eq!(store.clients.count().await, 0);
    assert_eq!(store.payments.count().await, 0);
}

#[tokio::test]
async fn load_all_surfaces_a_failed_fetch() {
    let backend = Arc::new(MemoryBackend::new());
    let store = store_over(backend.clone());

    backend.fail_next(RemoteError::Network("remote down".into()));
    let err = store.load_all().await.unwrap_err();
    assert!(err.is_retryable());
}

#[tokio::test]
async fn unrecognized_status_strings_coerce_instead_of_failing_the_load() {
    let backend = Arc::new(MemoryBackend::new());
    backend
        .seed(
            Collection::Payments,
            vec![
                json!({"id": "pay1", "amount": 10.0, "status": "some-new-status"}),
                json!({"id": "pay2", "amount": 20.0, "status": "approved"}),
            ],
        )
        .await;

    let store = store_over(backend);
    store.load_all().await.unwrap();

    let payments = store.payments.list().await;
    assert_eq!(payments.len(), 2);
    assert_eq!(payments[0].status, ApprovalStatus::Pending);
    assert_eq!(payments[1].status, ApprovalStatus::Approved);
}

// =============================================================================
// Round-Trip & Rollback
// =============================================================================

#[tokio::test]
async fn create_update_delete_round_trip() {
    let backend = Arc::new(MemoryBackend::new());
    let store = store_over(backend);

    let created = store
        .clients
        .create(&ClientDraft {
            city: Some("Pune".to_string()),
            ..ClientDraft::new("Acme Traders")
        })
        .await
        .unwrap();
    assert!(!created.id.is_empty());

    let listed = store.clients.list().await;
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].name, "Acme Traders");
    assert_eq!(listed[0].city.as_deref(), Some("Pune"));

    let patch = shopsync_core::drafts::ClientPatch {
        city: Some("Mumbai".to_string()),
        ..Default::default()
    };
    store.clients.update(&created.id, &patch).await.unwrap();
    let listed = store.clients.list().await;
    assert_eq!(listed[0].city.as_deref(), Some("Mumbai"));
    assert_eq!(listed[0].name, "Acme Traders");

    store.clients.delete(&created.id).await.unwrap();
    assert!(store.clients.list().await.is_empty());

    // Deleting again is still a success (idempotent)
    store.clients.delete(&created.id).await.unwrap();
}

#[tokio::test]
async fn failed_update_leaves_list_identical() {
    let backend = Arc::new(MemoryBackend::new());
    let store = store_over(backend.clone());

    let client = store.clients.create(&ClientDraft::new("Acme")).await.unwrap();
    let before = store.clients.list().await;

    backend.fail_next(RemoteError::Network("flaky".into()));
    let patch = shopsync_core::drafts::ClientPatch {
        city: Some("Mumbai".to_string()),
        ..Default::default()
    };
    let err = store.clients.update(&client.id, &patch).await.unwrap_err();
    assert!(err.is_retryable());

    assert_eq!(store.clients.list().await, before);
}

#[tokio::test]
async fn auth_failure_propagates_for_relogin() {
    let backend = Arc::new(MemoryBackend::new());
    let store = store_over(backend.clone());

    backend.fail_next(RemoteError::Auth("session expired".into()));
    let err = store
        .clients
        .create(&ClientDraft::new("Acme"))
        .await
        .unwrap_err();
    assert!(err.is_auth());
    assert!(store.clients.list().await.is_empty());
}

// =============================================================================
// Inventory Reconciliation - Dedicated Record Mode
// =============================================================================

#[tokio::test]
async fn transfer_moves_stock_between_buckets() {
    let backend = Arc::new(MemoryBackend::new());
    backend
        .seed(
            Collection::Products,
            vec![product_row("p1", 1, "Pen", 10.0, "15")],
        )
        .await;
    backend
        .seed(Collection::Inventory, vec![inventory_row(1, 10, 5, 5)])
        .await;

    let store = store_over(backend);
    store.load_all().await.unwrap();

    let view = store
        .stock()
        .transfer(&ProductRef::from(1), 3, StockLocation::Warehouse, StockLocation::Local)
        .await
        .unwrap();

    assert_eq!(view.warehouse, 7);
    assert_eq!(view.local, 8);
    assert_eq!(view.current(), 15);

    // The cached record reflects the confirmed state and keeps the invariant
    let record = store.inventory.find_by_product_id(1).await.unwrap();
    assert_eq!(record.warehouse_stock, 7);
    assert_eq!(record.local_stock, 8);
    assert_eq!(record.current_stock, record.warehouse_stock + record.local_stock);
    assert!(record.last_updated.is_some());
}

#[tokio::test]
async fn transfer_with_insufficient_stock_fails_and_mutates_nothing() {
    let backend = Arc::new(MemoryBackend::new());
    backend
        .seed(
            Collection::Products,
            vec![product_row("p1", 1, "Pen", 10.0, "15")],
        )
        .await;
    backend
        .seed(Collection::Inventory, vec![inventory_row(1, 10, 5, 5)])
        .await;

    let store = store_over(backend);
    store.load_all().await.unwrap();
    let before = store.inventory.list().await;

    let err = store
        .stock()
        .transfer(&ProductRef::from(1), 20, StockLocation::Local, StockLocation::Warehouse)
        .await
        .unwrap_err();

    match err {
        StoreError::Domain(shopsync_core::CoreError::InsufficientStock {
            location,
            available,
            requested,
        }) => {
            assert_eq!(location, StockLocation::Local);
            assert_eq!(available, 5);
            assert_eq!(requested, 20);
        }
        other => panic!("expected InsufficientStock, got {other:?}"),
    }

    assert_eq!(store.inventory.list().await, before);
}

#[tokio::test]
async fn transfer_rejects_zero_quantity_and_same_bucket() {
    let backend = Arc::new(MemoryBackend::new());
    backend
        .seed(
            Collection::Products,
            vec![product_row("p1", 1, "Pen", 10.0, "15")],
        )
        .await;
    backend
        .seed(Collection::Inventory, vec![inventory_row(1, 10, 5, 5)])
        .await;

    let store = store_over(backend);
    store.load_all().await.unwrap();

    let engine = store.stock();
    assert!(engine
        .transfer(&ProductRef::from(1), 0, StockLocation::Warehouse, StockLocation::Local)
        .await
        .is_err());
    assert!(engine
        .transfer(&ProductRef::from(1), 3, StockLocation::Local, StockLocation::Local)
        .await
        .is_err());

    // Nothing moved
    let record = store.inventory.find_by_product_id(1).await.unwrap();
    assert_eq!((record.warehouse_stock, record.local_stock), (10, 5));
}

#[tokio::test]
async fn restock_targets_the_local_bucket() {
    let backend = Arc::new(MemoryBackend::new());
    backend
        .seed(
            Collection::Products,
            vec![product_row("p1", 1, "Pen", 10.0, "15")],
        )
        .await;
    backend
        .seed(Collection::Inventory, vec![inventory_row(1, 10, 5, 5)])
        .await;

    let store = store_over(backend);
    store.load_all().await.unwrap();

    let view = store.stock().restock(&ProductRef::from(1), 7).await.unwrap();
    assert_eq!(view.warehouse, 10);
    assert_eq!(view.local, 12);
    assert_eq!(view.current(), 22);
}

// =============================================================================
// Inventory Reconciliation - Legacy Tagged-Row Mode
// =============================================================================

#[tokio::test]
async fn derived_view_reads_tagged_sibling_rows() {
    // Two products "Pen" and "Pen (Warehouse)" with units 10 and 4,
    // no inventory record present
    let backend = Arc::new(MemoryBackend::new());
    backend
        .seed(
            Collection::Products,
            vec![
                product_row("p1", 1, "Pen", 10.0, "10"),
                product_row("p2", 2, "Pen (Warehouse)", 10.0, "4"),
            ],
        )
        .await;

    let store = store_over(backend);
    store.load_all().await.unwrap();

    let view = store.stock().view(&ProductRef::from(1)).await.unwrap();
    assert_eq!(view.local, 10);
    assert_eq!(view.warehouse, 4);
    assert_eq!(view.current(), 14);
}

#[tokio::test]
async fn legacy_transfer_finds_or_creates_the_destination_row() {
    let backend = Arc::new(MemoryBackend::new());
    backend
        .seed(
            Collection::Products,
            vec![product_row("p1", 1, "Pen", 10.0, "10")],
        )
        .await;

    let store = store_over(backend);
    store.load_all().await.unwrap();

    let view = store
        .stock()
        .transfer(&ProductRef::from(1), 4, StockLocation::Local, StockLocation::Warehouse)
        .await
        .unwrap();
    assert_eq!(view.local, 6);
    assert_eq!(view.warehouse, 4);

    // The destination row was created with the source's attributes
    let warehouse_row = store.products.find_by_name("Pen (Warehouse)").await.unwrap();
    assert_eq!(warehouse_row.units, 4);
    assert_eq!(warehouse_row.category, "Stationery");
    assert_eq!(warehouse_row.price, Money::from_cents(1000));
    assert_eq!(warehouse_row.reorder_level, 5);

    // Transferring back uses the existing rows, no third row appears
    store
        .stock()
        .transfer(&ProductRef::from(1), 2, StockLocation::Warehouse, StockLocation::Local)
        .await
        .unwrap();
    assert_eq!(store.products.count().await, 2);
    let view = store.stock().view(&ProductRef::from(1)).await.unwrap();
    assert_eq!((view.warehouse, view.local), (2, 8));
}

#[tokio::test]
async fn legacy_transfer_with_insufficient_source_fails_clean() {
    let backend = Arc::new(MemoryBackend::new());
    backend
        .seed(
            Collection::Products,
            vec![product_row("p1", 1, "Pen", 10.0, "10")],
        )
        .await;

    let store = store_over(backend);
    store.load_all().await.unwrap();
    let before = store.products.list().await;

    // No warehouse row exists: the warehouse bucket reads zero
    let err = store
        .stock()
        .transfer(&ProductRef::from(1), 1, StockLocation::Warehouse, StockLocation::Local)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        StoreError::Domain(shopsync_core::CoreError::InsufficientStock { available: 0, .. })
    ));
    assert_eq!(store.products.list().await, before);
}

#[tokio::test]
async fn restock_migrates_a_legacy_product_onto_the_inventory_table() {
    let backend = Arc::new(MemoryBackend::new());
    backend
        .seed(
            Collection::Products,
            vec![
                product_row("p1", 1, "Pen", 10.0, "10"),
                product_row("p2", 2, "Pen (Warehouse)", 10.0, "4"),
            ],
        )
        .await;

    let store = store_over(backend);
    store.load_all().await.unwrap();
    assert!(store.inventory.find_by_product_id(1).await.is_none());

    let view = store.stock().restock(&ProductRef::from(1), 5).await.unwrap();
    assert_eq!(view.local, 15);
    assert_eq!(view.warehouse, 4);

    // A dedicated record now exists, seeded from the derived view
    let record = store.inventory.find_by_product_id(1).await.unwrap();
    assert_eq!(record.local_stock, 15);
    assert_eq!(record.warehouse_stock, 4);
    assert_eq!(record.current_stock, 19);
    assert_eq!(record.product_name, "Pen");

    // The read path now prefers the record
    let view = store.stock().view(&ProductRef::from(1)).await.unwrap();
    assert_eq!(view.current(), 19);
}

// =============================================================================
// Sale Recording
// =============================================================================

async fn seeded_sale_store() -> (Arc<MemoryBackend>, Store<MemoryBackend>) {
    let backend = Arc::new(MemoryBackend::new());
    backend
        .seed(
            Collection::Products,
            vec![product_row("p1", 1, "Pen", 100.0, "0")],
        )
        .await;
    backend
        .seed(Collection::Inventory, vec![inventory_row(1, 10, 5, 5)])
        .await;

    let store = store_over(backend.clone());
    store.load_all().await.unwrap();
    (backend, store)
}

#[tokio::test]
async fn record_sale_computes_total_and_prepends() {
    let (_backend, store) = seeded_sale_store().await;

    let draft = SaleDraft {
        client_name: Some("Acme".to_string()),
        ..SaleDraft::new("p1", 2, Money::from_cents(10000))
    };
    let sale = store.record_sale(draft).await.unwrap();

    assert_eq!(sale.total_amount, Money::from_cents(20000));
    assert_eq!(sale.product_id.as_deref(), Some("p1"));
    assert_eq!(store.sales.count().await, 1);

    // Deleting by id empties the collection again
    store.sales.delete(&sale.id).await.unwrap();
    assert_eq!(store.sales.count().await, 0);
}

#[tokio::test]
async fn record_sale_accepts_a_legacy_numeric_reference() {
    let (_backend, store) = seeded_sale_store().await;

    let draft = SaleDraft {
        client_name: Some("Acme".to_string()),
        ..SaleDraft::new("1", 1, Money::from_cents(10000))
    };
    let sale = store.record_sale(draft).await.unwrap();
    // Resolved to the canonical string id
    assert_eq!(sale.product_id.as_deref(), Some("p1"));
}

#[tokio::test]
async fn record_sale_validates_input_before_any_remote_call() {
    let (_backend, store) = seeded_sale_store().await;

    // Missing client
    let err = store
        .record_sale(SaleDraft::new("p1", 1, Money::from_cents(100)))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Domain(_)));

    // Non-positive quantity
    let draft = SaleDraft {
        client_name: Some("Acme".to_string()),
        ..SaleDraft::new("p1", 0, Money::from_cents(100))
    };
    assert!(store.record_sale(draft).await.is_err());

    // Unknown product
    let draft = SaleDraft {
        client_name: Some("Acme".to_string()),
        ..SaleDraft::new("ghost", 1, Money::from_cents(100))
    };
    assert!(store.record_sale(draft).await.is_err());

    // Insufficient local stock (5 on the shop floor)
    let draft = SaleDraft {
        client_name: Some("Acme".to_string()),
        ..SaleDraft::new("p1", 9, Money::from_cents(100))
    };
    let err = store.record_sale(draft).await.unwrap_err();
    assert!(matches!(
        err,
        StoreError::Domain(shopsync_core::CoreError::InsufficientStock { .. })
    ));

    assert_eq!(store.sales.count().await, 0);
}

// =============================================================================
// Derived Analytics
// =============================================================================

#[tokio::test]
async fn dashboard_analytics_over_seeded_data() {
    let backend = Arc::new(MemoryBackend::new());
    backend
        .seed(
            Collection::Products,
            vec![
                product_row("p1", 1, "Pen", 10.0, "0"),
                product_row("p2", 2, "Notebook", 20.0, "0"),
            ],
        )
        .await;
    backend
        .seed(
            Collection::Inventory,
            vec![inventory_row(1, 0, 0, 5), inventory_row(2, 1, 2, 5)],
        )
        .await;
    backend
        .seed(
            Collection::Sales,
            vec![
                json!({
                    "id": "s1", "product_id": "p1", "quantity_sold": 2,
                    "selling_price": 100.0, "sale_date": "2025-06-15T10:00:00Z",
                }),
                json!({
                    "id": "s2", "product_id": "p1", "quantity_sold": 1,
                    "selling_price": 50.0, "sale_date": "2025-06-14T10:00:00Z",
                }),
            ],
        )
        .await;

    let store = store_over(backend);
    store.load_all().await.unwrap();

    let analytics = store.analytics_at(&test_now()).await;
    // today: one sale of 2 × 100.00
    assert_eq!(analytics.today_revenue, Money::from_cents(20000));
    assert_eq!(analytics.today_transactions, 1);
    assert_eq!(analytics.monthly_transactions, 2);
    assert_eq!(analytics.total_products, 2);
    assert_eq!(analytics.out_of_stock_count, 1);
    assert_eq!(analytics.low_stock_count, 1);
    // 0 × 10.00 + 3 × 20.00
    assert_eq!(analytics.total_inventory_value, Money::from_cents(6000));

    let series = store.revenue_series_at(7, &test_now()).await;
    assert_eq!(series.len(), 7);
    assert_eq!(series[6].revenue, Money::from_cents(20000));
    assert_eq!(series[5].revenue, Money::from_cents(5000));
    assert_eq!(series[0].revenue, Money::zero());

    let top = store.top_products().await;
    assert_eq!(top[0].name, "Pen");
    assert_eq!(top[0].revenue, Money::from_cents(25000));
}

#[tokio::test]
async fn analytics_recompute_after_every_mutation() {
    let backend = Arc::new(MemoryBackend::new());
    let store = store_over(backend);

    let product = store
        .products
        .create(&ProductDraft::new("Pen", Money::from_cents(10000), 0))
        .await
        .unwrap();
    store
        .stock()
        .restock(&ProductRef::Id(product.id.clone()), 10)
        .await
        .unwrap();

    let draft = SaleDraft {
        client_name: Some("Acme".to_string()),
        sale_date: Some(test_now()),
        ..SaleDraft::new(product.id.clone(), 2, Money::from_cents(10000))
    };
    store.record_sale(draft).await.unwrap();

    let analytics = store.analytics_at(&test_now()).await;
    assert_eq!(analytics.today_revenue, Money::from_cents(20000));
    assert_eq!(analytics.today_transactions, 1);
    assert_eq!(analytics.total_products, 1);
}
