//! # Derived Analytics View
//!
//! Pure read-only projections computed from repository snapshots - no
//! independent remote fetch of aggregates, no caching beyond the call.
//!
//! ## Projections
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  sales_summary      today / month / year revenue & transaction counts   │
//! │  inventory_summary  product count, low/out-of-stock counts, total value │
//! │  revenue_series     one zero-filled bucket per trailing calendar day    │
//! │  top_products       top 5 by revenue, grouped by resolved identity      │
//! │                                                                         │
//! │  Day boundaries come from the CALLER's time zone: every function is     │
//! │  generic over chrono::TimeZone, the façade passes Local.                │
//! │                                                                         │
//! │  Grouping by resolved identity merges a product's local- and            │
//! │  warehouse-tagged sibling rows, so revenue and value never split or     │
//! │  double-count across the legacy encoding.                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone};
use serde::Serialize;
use ts_rs::TS;

use shopsync_core::types::{InventoryRecord, Product, ProductRef, Sale};
use shopsync_core::{stock, Money, TOP_PRODUCTS_LIMIT};

// =============================================================================
// Projections
// =============================================================================

/// Revenue and transaction aggregates over the calendar buckets the
/// dashboard header shows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, TS)]
#[ts(export)]
pub struct SalesSummary {
    pub today_revenue: Money,
    pub monthly_revenue: Money,
    pub yearly_revenue: Money,
    pub today_transactions: usize,
    pub monthly_transactions: usize,
    pub yearly_transactions: usize,
}

/// Stock health aggregates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, TS)]
#[ts(export)]
pub struct InventorySummary {
    /// Distinct resolved product identities in the catalog.
    pub total_products: usize,
    /// Records with `0 < current_stock <= reorder_level`.
    pub low_stock_count: usize,
    /// Records with `current_stock == 0`.
    pub out_of_stock_count: usize,
    /// `Σ current_stock × unit price` over resolved identities.
    pub total_inventory_value: Money,
}

/// The full dashboard header block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, TS)]
#[ts(export)]
pub struct DashboardAnalytics {
    pub today_revenue: Money,
    pub monthly_revenue: Money,
    pub yearly_revenue: Money,
    pub today_transactions: usize,
    pub monthly_transactions: usize,
    pub yearly_transactions: usize,
    pub total_products: usize,
    pub low_stock_count: usize,
    pub out_of_stock_count: usize,
    pub total_inventory_value: Money,
}

/// One day of the revenue chart.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
pub struct RevenuePoint {
    #[ts(as = "String")]
    pub date: NaiveDate,
    pub revenue: Money,
}

/// One bar of the top-products chart.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
pub struct ProductRevenue {
    pub name: String,
    pub revenue: Money,
}

// =============================================================================
// Sales Aggregates
// =============================================================================

/// Buckets sales by calendar day/month/year in the caller's time zone.
///
/// "Today" is a calendar-day match, "this month" same month and year, "this
/// year" same year. Revenue sums the recorded `total_amount` (which already
/// honors remote overrides).
pub fn sales_summary<Tz: TimeZone>(sales: &[Sale], now: &DateTime<Tz>) -> SalesSummary {
    let today = now.date_naive();
    let mut summary = SalesSummary::default();

    for sale in sales {
        let day = sale.sale_date.with_timezone(&now.timezone()).date_naive();

        if day.year() == today.year() {
            summary.yearly_revenue += sale.total_amount;
            summary.yearly_transactions += 1;

            if day.month() == today.month() {
                summary.monthly_revenue += sale.total_amount;
                summary.monthly_transactions += 1;
            }
            if day == today {
                summary.today_revenue += sale.total_amount;
                summary.today_transactions += 1;
            }
        }
    }

    summary
}

// =============================================================================
// Inventory Aggregates
// =============================================================================

/// Stock health over the current catalog and inventory records.
///
/// Low/out-of-stock counts consider dedicated records only: a product with
/// no record is excluded from both (not assumed zero). Total value uses the
/// reconciliation read path, so legacy products still contribute and sibling
/// rows never double-count.
pub fn inventory_summary(products: &[Product], records: &[InventoryRecord]) -> InventorySummary {
    let identities = stock::resolved_identities(products);

    let mut total_value = Money::zero();
    for base in &identities {
        // Representative row: prefer the untagged sibling, else whichever
        // row carries the identity
        let representative = stock::find_by_name(products, base)
            .or_else(|| stock::find_by_name(products, &stock::warehouse_name(base)));
        let Some(representative) = representative else {
            continue;
        };

        let key = ProductRef::Id(representative.id.clone());
        if let Ok(resolved) = stock::resolve(products, records, &key) {
            total_value += representative.price.multiply_quantity(resolved.view().current());
        }
    }

    InventorySummary {
        total_products: identities.len(),
        low_stock_count: records.iter().filter(|r| r.is_low_stock()).count(),
        out_of_stock_count: records.iter().filter(|r| r.is_out_of_stock()).count(),
        total_inventory_value: total_value,
    }
}

/// The combined dashboard header block.
pub fn dashboard<Tz: TimeZone>(
    products: &[Product],
    records: &[InventoryRecord],
    sales: &[Sale],
    now: &DateTime<Tz>,
) -> DashboardAnalytics {
    let sales_part = sales_summary(sales, now);
    let inventory_part = inventory_summary(products, records);

    DashboardAnalytics {
        today_revenue: sales_part.today_revenue,
        monthly_revenue: sales_part.monthly_revenue,
        yearly_revenue: sales_part.yearly_revenue,
        today_transactions: sales_part.today_transactions,
        monthly_transactions: sales_part.monthly_transactions,
        yearly_transactions: sales_part.yearly_transactions,
        total_products: inventory_part.total_products,
        low_stock_count: inventory_part.low_stock_count,
        out_of_stock_count: inventory_part.out_of_stock_count,
        total_inventory_value: inventory_part.total_inventory_value,
    }
}

// =============================================================================
// Revenue Series
// =============================================================================

/// Daily revenue over a trailing window ending today, oldest first.
///
/// The series is always fully populated: days with no sales yield a
/// zero-value bucket, so charts render a continuous axis.
pub fn revenue_series<Tz: TimeZone>(
    sales: &[Sale],
    days: u32,
    now: &DateTime<Tz>,
) -> Vec<RevenuePoint> {
    let today = now.date_naive();
    let start = today - Duration::days(i64::from(days) - 1);

    let mut points: Vec<RevenuePoint> = (0..days)
        .map(|offset| RevenuePoint {
            date: start + Duration::days(i64::from(offset)),
            revenue: Money::zero(),
        })
        .collect();

    for sale in sales {
        let day = sale.sale_date.with_timezone(&now.timezone()).date_naive();
        if day < start || day > today {
            continue;
        }
        let index = (day - start).num_days() as usize;
        points[index].revenue += sale.total_amount;
    }

    points
}

// =============================================================================
// Top Products
// =============================================================================

/// Top products by revenue, grouped by resolved product identity.
///
/// Revenue per group is `Σ selling_price × quantity_sold`. Sales whose
/// product no longer resolves fall back to their denormalized product name,
/// then to an "Unknown" bucket. Descending by revenue, ties keep
/// first-seen order.
pub fn top_products(sales: &[Sale], products: &[Product], limit: usize) -> Vec<ProductRevenue> {
    let mut groups: Vec<ProductRevenue> = Vec::new();

    for sale in sales {
        let name = sale
            .product_id
            .as_ref()
            .and_then(|id| stock::find_product(products, &ProductRef::Id(id.clone())))
            .map(|p| p.base_name().to_string())
            .or_else(|| {
                sale.product_name
                    .as_ref()
                    .map(|n| stock::base_name(n).to_string())
            })
            .unwrap_or_else(|| "Unknown".to_string());

        let revenue = sale.line_total();
        match groups.iter_mut().find(|g| g.name == name) {
            Some(group) => group.revenue += revenue,
            None => groups.push(ProductRevenue { name, revenue }),
        }
    }

    groups.sort_by(|a, b| b.revenue.cmp(&a.revenue));
    groups.truncate(limit);
    groups
}

/// [`top_products`] with the conventional top-5 limit.
pub fn top_products_default(sales: &[Sale], products: &[Product]) -> Vec<ProductRevenue> {
    top_products(sales, products, TOP_PRODUCTS_LIMIT)
}

// =============================================================================
// Unit Tests
// =============================================================================
