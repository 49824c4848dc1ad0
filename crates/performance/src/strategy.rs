//! Pluggable revenue and bonus rules.
//!
//! Both seams are single-method traits with blanket impls for closures, so a
//! caller can pass either one of the reference types below or a plain `Fn`.

use salesboard_products::Product;
use salesboard_sales::LineItem;

use crate::ledger::SellerStats;

/// Computes the revenue of one line item.
///
/// Implementations must tolerate missing fields (the [`LineItem`] accessors
/// already report them as zero) and should return a non-negative amount.
pub trait RevenueStrategy: Send + Sync {
    fn line_revenue(&self, item: &LineItem, product: Option<&Product>) -> f64;
}

impl<F> RevenueStrategy for F
where
    F: Fn(&LineItem, Option<&Product>) -> f64 + Send + Sync,
{
    fn line_revenue(&self, item: &LineItem, product: Option<&Product>) -> f64 {
        self(item, product)
    }
}

/// Computes a seller's bonus from its rank.
///
/// `rank` is zero-based in profit-descending order and `total` is the number
/// of ranked sellers. `seller` carries the seller's folded totals.
pub trait BonusStrategy: Send + Sync {
    fn bonus(&self, rank: usize, total: usize, seller: &SellerStats) -> f64;
}

impl<F> BonusStrategy for F
where
    F: Fn(usize, usize, &SellerStats) -> f64 + Send + Sync,
{
    fn bonus(&self, rank: usize, total: usize, seller: &SellerStats) -> f64 {
        self(rank, total, seller)
    }
}

/// `sale_price * quantity * (1 - discount / 100)`, clamped at zero.
fn discounted(unit_price: f64, quantity: f64, discount: f64) -> f64 {
    let revenue = unit_price * quantity * (1.0 - discount / 100.0);
    if revenue.is_finite() && revenue > 0.0 { revenue } else { 0.0 }
}

/// Revenue from the price, quantity and discount recorded on the line itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct LineItemRevenue;

impl RevenueStrategy for LineItemRevenue {
    fn line_revenue(&self, item: &LineItem, _product: Option<&Product>) -> f64 {
        discounted(item.sale_price(), item.quantity(), item.discount())
    }
}

/// Revenue priced from the catalog instead of the purchase record.
///
/// The unit price is the resolved product's sale price; the line's own price is
/// used only when the product is unknown. A line without a discount falls back
/// to the product's discount metadata.
#[derive(Debug, Clone, Copy, Default)]
pub struct CatalogPriceRevenue;

impl RevenueStrategy for CatalogPriceRevenue {
    fn line_revenue(&self, item: &LineItem, product: Option<&Product>) -> f64 {
        let unit_price = product.map(|p| p.sale_price).unwrap_or_else(|| item.sale_price());
        let discount = match (item.discount, product) {
            (Some(_), _) => item.discount(),
            (None, Some(p)) => p.discount_percent(),
            (None, None) => 0.0,
        };
        discounted(unit_price, item.quantity(), discount)
    }
}

/// Rank-bucketed bonus as a percentage of profit.
///
/// Buckets are checked in order and the first match wins:
/// 1. rank 0
/// 2. rank 1 or 2
/// 3. last rank, only when more than one seller is ranked
/// 4. everyone else
///
/// With a single seller the rank-0 bucket applies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TieredBonus {
    pub top_percent: f64,
    pub runner_up_percent: f64,
    pub last_percent: f64,
    pub default_percent: f64,
}

impl Default for TieredBonus {
    fn default() -> Self {
        Self {
            top_percent: 15.0,
            runner_up_percent: 10.0,
            last_percent: 0.0,
            default_percent: 5.0,
        }
    }
}

impl TieredBonus {
    /// Percentage applicable to `rank` out of `total`.
    pub fn percent_for(&self, rank: usize, total: usize) -> f64 {
        if rank == 0 {
            self.top_percent
        } else if rank == 1 || rank == 2 {
            self.runner_up_percent
        } else if total > 1 && rank == total - 1 {
            self.last_percent
        } else {
            self.default_percent
        }
    }
}

impl BonusStrategy for TieredBonus {
    fn bonus(&self, rank: usize, total: usize, seller: &SellerStats) -> f64 {
        seller.profit * self.percent_for(rank, total) / 100.0
    }
}
