//! Per-seller running totals built while purchase records are folded.

use std::collections::HashMap;

use salesboard_core::{Entity, ProductKey, SellerId, sanitize_amount};
use salesboard_parties::Seller;
use salesboard_products::ProductCatalog;
use salesboard_sales::PurchaseRecord;

use crate::report::ProductQuantity;
use crate::strategy::RevenueStrategy;

/// Cumulative quantity sold per product, in first-sold order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductTally {
    entries: Vec<ProductQuantity>,
    index: HashMap<ProductKey, usize>,
}

impl ProductTally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, sku: &ProductKey, quantity: f64) {
        match self.index.get(sku) {
            Some(&pos) => self.entries[pos].quantity += quantity,
            None => {
                self.index.insert(sku.clone(), self.entries.len());
                self.entries.push(ProductQuantity {
                    sku: sku.clone(),
                    quantity,
                });
            }
        }
    }

    pub fn quantity_of(&self, sku: &ProductKey) -> f64 {
        self.index
            .get(sku)
            .map(|&pos| self.entries[pos].quantity)
            .unwrap_or(0.0)
    }

    pub fn entries(&self) -> &[ProductQuantity] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Union-with-sum. Products new to `self` are appended in `other`'s order.
    pub fn merge(&mut self, other: &ProductTally) {
        for entry in &other.entries {
            self.add(&entry.sku, entry.quantity);
        }
    }

    /// Up to `limit` products by quantity descending; ties keep first-sold order.
    pub fn top(&self, limit: usize) -> Vec<ProductQuantity> {
        let mut ranked = self.entries.clone();
        ranked.sort_by(|a, b| b.quantity.total_cmp(&a.quantity));
        ranked.truncate(limit);
        ranked
    }
}

/// Seller accumulator: running totals for one seller.
#[derive(Debug, Clone, PartialEq)]
pub struct SellerStats {
    pub seller_id: SellerId,
    pub name: String,
    pub revenue: f64,
    pub profit: f64,
    /// Number of purchase records attributed to the seller.
    pub sales_count: u64,
    pub products_sold: ProductTally,
}

impl SellerStats {
    pub fn new(seller_id: SellerId, name: impl Into<String>) -> Self {
        Self {
            seller_id,
            name: name.into(),
            revenue: 0.0,
            profit: 0.0,
            sales_count: 0,
            products_sold: ProductTally::new(),
        }
    }

    pub fn merge(&mut self, other: &SellerStats) {
        self.revenue = sanitize_amount(self.revenue + other.revenue);
        self.profit = sanitize_amount(self.profit + other.profit);
        self.sales_count += other.sales_count;
        self.products_sold.merge(&other.products_sold);
    }
}

/// Seller accumulators for one aggregation run, in seller input order.
///
/// Built once from the seller list with one accumulator per seller record.
/// When several sellers share an id, purchase records resolve to the first of
/// them and the later ones keep zero totals. Records for unknown sellers are
/// counted as skipped and otherwise ignored.
#[derive(Debug, Clone, PartialEq)]
pub struct Ledger {
    sellers: Vec<SellerStats>,
    index: HashMap<SellerId, usize>,
    skipped: usize,
}

impl Ledger {
    pub fn new(sellers: &[Seller]) -> Self {
        let mut ledger = Self {
            sellers: Vec::with_capacity(sellers.len()),
            index: HashMap::with_capacity(sellers.len()),
            skipped: 0,
        };

        for seller in sellers {
            let id = seller.id();
            if ledger.index.contains_key(id) {
                tracing::debug!(
                    seller_id = %id,
                    "duplicate seller id; purchase records resolve to the first"
                );
            } else {
                ledger.index.insert(id.clone(), ledger.sellers.len());
            }
            ledger
                .sellers
                .push(SellerStats::new(id.clone(), seller.display_name()));
        }

        ledger
    }

    /// Fold one purchase record into its seller's totals.
    ///
    /// Returns `false` when the record was skipped because its seller is
    /// unknown (blank seller ids never match).
    pub fn fold(
        &mut self,
        record: &PurchaseRecord,
        catalog: &ProductCatalog,
        revenue: &dyn RevenueStrategy,
    ) -> bool {
        let pos = match self.resolve(&record.seller_id) {
            Some(pos) => pos,
            None => {
                self.skipped += 1;
                tracing::debug!(
                    seller_id = %record.seller_id,
                    receipt_id = record.receipt_id.as_deref().unwrap_or(""),
                    "purchase record for unknown seller skipped"
                );
                return false;
            }
        };
        let stats = &mut self.sellers[pos];

        stats.sales_count += 1;

        let mut line_revenue_total = 0.0;
        for item in record.line_items() {
            let sku = item.sku.as_ref().filter(|k| !k.as_str().trim().is_empty());
            let product = sku.and_then(|k| catalog.get(k));

            let item_revenue = sanitize_amount(revenue.line_revenue(item, product));
            let item_cost = sanitize_amount(catalog.unit_cost(sku) * item.quantity());

            line_revenue_total += item_revenue;
            stats.profit = sanitize_amount(stats.profit + item_revenue - item_cost);

            if let Some(sku) = sku {
                stats.products_sold.add(sku, item.quantity());
            }
        }

        let record_revenue = record
            .explicit_total()
            .unwrap_or_else(|| sanitize_amount(line_revenue_total));
        stats.revenue = sanitize_amount(stats.revenue + record_revenue);
        true
    }

    /// Fold `other` into `self`, accumulator by accumulator.
    ///
    /// Both ledgers are expected to come from the same seller list, so
    /// accumulators line up by position. Accumulators only present in `other`
    /// are appended.
    pub fn merge(&mut self, other: &Ledger) {
        for (pos, stats) in other.sellers.iter().enumerate() {
            if pos < self.sellers.len() {
                self.sellers[pos].merge(stats);
            } else {
                let next = self.sellers.len();
                self.index.entry(stats.seller_id.clone()).or_insert(next);
                self.sellers.push(stats.clone());
            }
        }
        self.skipped += other.skipped;
    }

    pub fn get(&self, seller_id: &SellerId) -> Option<&SellerStats> {
        self.index.get(seller_id).map(|&pos| &self.sellers[pos])
    }

    pub fn sellers(&self) -> &[SellerStats] {
        &self.sellers
    }

    /// Number of purchase records skipped for unknown sellers.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Consume the ledger, ranking sellers by profit descending.
    ///
    /// The sort is stable, so sellers with equal profit keep input order.
    pub fn into_ranked(self) -> Vec<SellerStats> {
        let mut ranked = self.sellers;
        ranked.sort_by(|a, b| b.profit.total_cmp(&a.profit));
        ranked
    }

    fn resolve(&self, seller_id: &SellerId) -> Option<usize> {
        if seller_id.as_str().trim().is_empty() {
            return None;
        }
        self.index.get(seller_id).copied()
    }
}
