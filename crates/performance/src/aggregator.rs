//! The aggregation run: validate, index, fold, rank, finalize, project.

use std::num::NonZeroUsize;

use salesboard_core::{AggregationResult, round_money, sanitize_amount};
use salesboard_products::ProductCatalog;
use salesboard_sales::PurchaseRecord;

use crate::dataset::Dataset;
use crate::ledger::{Ledger, SellerStats};
use crate::options::AggregationOptions;
use crate::report::SellerReport;
use crate::strategy::{BonusStrategy, RevenueStrategy};

/// Seller performance aggregation over a [`Dataset`].
///
/// Model:
/// - Fold every purchase record into its seller's running totals (records for
///   unknown sellers are skipped).
/// - Rank sellers by profit, descending; ties keep seller input order.
/// - Assign bonuses by rank and keep each seller's best-selling products.
///
/// A run either fails validation before touching any state or returns one
/// report per seller record.
#[derive(Debug, Clone)]
pub struct Aggregator {
    options: AggregationOptions,
    shards: NonZeroUsize,
}

impl Aggregator {
    pub fn new(options: AggregationOptions) -> Self {
        Self {
            options,
            shards: NonZeroUsize::MIN,
        }
    }

    /// Fold purchase records on `shards` scoped threads, merging the partial
    /// ledgers before ranking.
    pub fn with_shards(mut self, shards: NonZeroUsize) -> Self {
        self.shards = shards;
        self
    }

    pub fn options(&self) -> &AggregationOptions {
        &self.options
    }

    pub fn run(&self, dataset: &Dataset) -> AggregationResult<Vec<SellerReport>> {
        dataset.validate()?;
        let (revenue, bonus) = self.options.strategies()?;

        let span = tracing::info_span!(
            "aggregate",
            sellers = dataset.sellers.len(),
            products = dataset.products.len(),
            purchase_records = dataset.purchase_records.len(),
            shards = self.shards.get(),
        );
        let _enter = span.enter();

        let catalog = dataset.catalog();
        let ledger = if self.shards.get() > 1 {
            fold_sharded(dataset, &catalog, revenue, self.shards)
        } else {
            fold(dataset, &dataset.purchase_records, &catalog, revenue)
        };

        let skipped = ledger.skipped();
        let reports = finalize(ledger, bonus, self.options.top_products_limit());

        tracing::info!(
            reports = reports.len(),
            skipped_records = skipped,
            "seller performance aggregated"
        );

        Ok(reports)
    }
}

/// Aggregate `dataset` on the calling thread.
pub fn aggregate(
    dataset: &Dataset,
    options: &AggregationOptions,
) -> AggregationResult<Vec<SellerReport>> {
    Aggregator::new(options.clone()).run(dataset)
}

/// Aggregate `dataset`, folding purchase records on `shards` threads.
///
/// Produces the same reports as [`aggregate`], up to floating-point summation
/// order. `shards == 0` is treated as 1.
pub fn aggregate_sharded(
    dataset: &Dataset,
    options: &AggregationOptions,
    shards: usize,
) -> AggregationResult<Vec<SellerReport>> {
    let shards = NonZeroUsize::new(shards).unwrap_or(NonZeroUsize::MIN);
    Aggregator::new(options.clone()).with_shards(shards).run(dataset)
}

fn fold(
    dataset: &Dataset,
    records: &[PurchaseRecord],
    catalog: &ProductCatalog,
    revenue: &dyn RevenueStrategy,
) -> Ledger {
    let mut ledger = Ledger::new(&dataset.sellers);
    for record in records {
        ledger.fold(record, catalog, revenue);
    }
    ledger
}

fn fold_sharded(
    dataset: &Dataset,
    catalog: &ProductCatalog,
    revenue: &dyn RevenueStrategy,
    shards: NonZeroUsize,
) -> Ledger {
    let records = &dataset.purchase_records;
    let chunk_size = records.len().div_ceil(shards.get()).max(1);

    // Chunks are contiguous and merged in order, so first-seen product order
    // matches a sequential fold.
    let partials: Vec<Ledger> = std::thread::scope(|scope| {
        let handles: Vec<_> = records
            .chunks(chunk_size)
            .map(|chunk| scope.spawn(move || fold(dataset, chunk, catalog, revenue)))
            .collect();

        handles
            .into_iter()
            .map(|handle| match handle.join() {
                Ok(ledger) => ledger,
                Err(panic) => std::panic::resume_unwind(panic),
            })
            .collect()
    });

    let mut partials = partials.into_iter();
    let mut ledger = partials
        .next()
        .unwrap_or_else(|| Ledger::new(&dataset.sellers));
    for partial in partials {
        ledger.merge(&partial);
    }
    ledger
}

fn finalize(
    ledger: Ledger,
    bonus: &dyn BonusStrategy,
    top_products_limit: usize,
) -> Vec<SellerReport> {
    let ranked = ledger.into_ranked();
    let total = ranked.len();

    ranked
        .iter()
        .enumerate()
        .map(|(rank, stats)| project(rank, total, stats, bonus, top_products_limit))
        .collect()
}

fn project(
    rank: usize,
    total: usize,
    stats: &SellerStats,
    bonus: &dyn BonusStrategy,
    top_products_limit: usize,
) -> SellerReport {
    let bonus = sanitize_amount(bonus.bonus(rank, total, stats));

    SellerReport {
        seller_id: stats.seller_id.clone(),
        name: stats.name.clone(),
        revenue: round_money(stats.revenue),
        profit: round_money(stats.profit),
        sales_count: stats.sales_count,
        bonus: round_money(bonus),
        top_products: stats.products_sold.top(top_products_limit),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use salesboard_core::{AggregationError, ProductKey};
    use salesboard_parties::Seller;
    use salesboard_products::Product;
    use salesboard_sales::LineItem;

    use crate::strategy::{LineItemRevenue, TieredBonus};

    fn options() -> AggregationOptions {
        AggregationOptions::new()
            .with_revenue(LineItemRevenue)
            .with_bonus(TieredBonus::default())
    }

    /// One seller per profit, each selling one zero-cost unit priced at that profit.
    fn ranked_dataset(profits: &[f64]) -> Dataset {
        let sellers = (0..profits.len())
            .map(|i| Seller::new(format!("seller_{i}"), format!("Seller{i}"), "Test"))
            .collect();
        let records = profits
            .iter()
            .enumerate()
            .map(|(i, p)| {
                PurchaseRecord::flat(format!("seller_{i}"), LineItem::new("FREE", *p, 1.0))
            })
            .collect();
        Dataset::new(sellers, vec![Product::new("FREE", 0.0, 0.0)], records)
    }

    #[test]
    fn bonus_tiers_follow_rank() {
        // Input order deliberately scrambled.
        let dataset = ranked_dataset(&[300.0, 100.0, 500.0, 200.0, 400.0]);
        let reports = aggregate(&dataset, &options()).unwrap();

        let profits: Vec<f64> = reports.iter().map(|r| r.profit).collect();
        let bonuses: Vec<f64> = reports.iter().map(|r| r.bonus).collect();
        assert_eq!(profits, vec![500.0, 400.0, 300.0, 200.0, 100.0]);
        assert_eq!(bonuses, vec![75.0, 40.0, 30.0, 10.0, 0.0]);
    }

    #[test]
    fn single_seller_gets_top_bonus() {
        let dataset = ranked_dataset(&[1000.0]);
        let reports = aggregate(&dataset, &options()).unwrap();

        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].bonus, 150.0);
    }

    #[test]
    fn every_seller_is_reported_even_without_sales() {
        let mut dataset = ranked_dataset(&[10.0]);
        dataset.sellers.push(Seller::new("idle", "Idle", "Seller"));

        let reports = aggregate(&dataset, &options()).unwrap();
        assert_eq!(reports.len(), 2);

        let idle = &reports[1];
        assert_eq!(idle.seller_id.as_str(), "idle");
        assert_eq!(idle.name, "Idle Seller");
        assert_eq!(idle.sales_count, 0);
        assert_eq!(idle.revenue, 0.0);
        assert!(idle.top_products.is_empty());
    }

    #[test]
    fn duplicate_seller_ids_still_get_one_report_each() {
        let dataset = Dataset::new(
            vec![
                Seller::new("s1", "First", "Record"),
                Seller::new("s1", "Second", "Record"),
            ],
            vec![Product::new("SKU_1", 10.0, 4.0)],
            vec![PurchaseRecord::flat("s1", LineItem::new("SKU_1", 10.0, 1.0))],
        );

        let reports = aggregate(&dataset, &options()).unwrap();
        assert_eq!(reports.len(), dataset.sellers.len());
        assert_eq!(reports[0].name, "First Record");
        assert_eq!(reports[0].profit, 6.0);
        assert_eq!(reports[1].name, "Second Record");
        assert_eq!(reports[1].sales_count, 0);

        assert_eq!(aggregate_sharded(&dataset, &options(), 2).unwrap(), reports);
    }

    #[test]
    fn overflowing_costs_keep_reports_ranked() {
        let dataset = Dataset::new(
            vec![
                Seller::new("a", "A", ""),
                Seller::new("b", "B", ""),
                Seller::new("c", "C", ""),
            ],
            vec![Product::new("CHEAP", 5.0, 10.0), Product::new("HEAVY", 1.0, 1e308)],
            vec![
                PurchaseRecord::flat("a", LineItem::new("CHEAP", 5.0, 1.0)),
                PurchaseRecord::flat("b", LineItem::new("HEAVY", 1.0, 10.0)),
            ],
        );

        let reports = aggregate(&dataset, &options()).unwrap();
        for pair in reports.windows(2) {
            assert!(pair[0].profit >= pair[1].profit);
        }
        let ids: Vec<&str> = reports.iter().map(|r| r.seller_id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c", "a"]);
    }

    #[test]
    fn aggregator_keeps_its_options() {
        let aggregator = Aggregator::new(options().with_top_products_limit(3))
            .with_shards(NonZeroUsize::new(2).unwrap());
        assert_eq!(aggregator.options().top_products_limit(), 3);

        let dataset = ranked_dataset(&[10.0, 20.0]);
        assert_eq!(aggregator.run(&dataset).unwrap(), aggregate(&dataset, &options()).unwrap());
    }

    #[test]
    fn amounts_are_rounded_to_cents() {
        let dataset = Dataset::new(
            vec![Seller::new("seller_1", "A", "B")],
            vec![Product::new("SKU_1", 0.0, 1.111)],
            vec![PurchaseRecord::flat(
                "seller_1",
                LineItem::new("SKU_1", 3.333, 3.0).with_discount(7.0),
            )],
        );

        let report = &aggregate(&dataset, &options()).unwrap()[0];
        // 3.333 * 3 * 0.93 = 9.29907; cost 3.333
        assert_eq!(report.revenue, 9.3);
        assert_eq!(report.profit, 5.97);
        // bonus is taken on the unrounded profit
        assert_eq!(report.bonus, 0.89);
    }

    #[test]
    fn top_products_capped_and_sorted() {
        let items: Vec<LineItem> = (1..=12u32)
            .map(|i| LineItem::new(format!("SKU_{i}"), 1.0, f64::from(i)))
            .collect();
        let dataset = Dataset::new(
            vec![Seller::new("seller_1", "A", "B")],
            vec![Product::new("SKU_1", 1.0, 0.5)],
            vec![PurchaseRecord::itemised("seller_1", items)],
        );

        let report = &aggregate(&dataset, &options()).unwrap()[0];
        assert_eq!(report.top_products.len(), 10);
        assert_eq!(report.top_products[0].sku, ProductKey::new("SKU_12"));
        assert_eq!(report.top_products[9].sku, ProductKey::new("SKU_3"));

        let limited = aggregate(&dataset, &options().with_top_products_limit(2)).unwrap();
        assert_eq!(limited[0].top_products.len(), 2);
    }

    #[test]
    fn sales_count_is_per_record() {
        let dataset = Dataset::new(
            vec![Seller::new("seller_1", "A", "B")],
            vec![Product::new("SKU_1", 1.0, 0.5)],
            vec![
                PurchaseRecord::itemised(
                    "seller_1",
                    vec![LineItem::new("SKU_1", 1.0, 5.0), LineItem::new("SKU_1", 1.0, 2.0)],
                ),
                PurchaseRecord::flat("seller_1", LineItem::new("SKU_1", 1.0, 1.0)),
            ],
        );

        let report = &aggregate(&dataset, &options()).unwrap()[0];
        assert_eq!(report.sales_count, 2);
        assert_eq!(report.top_products[0].quantity, 8.0);
    }

    #[test]
    fn unknown_seller_records_do_not_fail() {
        let mut dataset = ranked_dataset(&[100.0, 50.0]);
        let baseline = aggregate(&dataset, &options()).unwrap();

        dataset.purchase_records.push(PurchaseRecord::flat(
            "ghost",
            LineItem::new("FREE", 1_000_000.0, 1.0),
        ));
        let with_ghost = aggregate(&dataset, &options()).unwrap();

        assert_eq!(baseline, with_ghost);
    }

    #[test]
    fn empty_purchase_records_fail_fast() {
        let mut dataset = ranked_dataset(&[1.0]);
        dataset.purchase_records.clear();

        match aggregate(&dataset, &options()).unwrap_err() {
            AggregationError::MissingPurchaseRecords(_) => {}
            other => panic!("Expected MissingPurchaseRecords, got {other:?}"),
        }
    }

    #[test]
    fn missing_bonus_strategy_is_invalid_options() {
        let dataset = ranked_dataset(&[1.0]);
        let options = AggregationOptions::new().with_revenue(LineItemRevenue);

        match aggregate(&dataset, &options).unwrap_err() {
            AggregationError::InvalidOptions(msg) if msg.contains("calculate_bonus") => {}
            other => panic!("Expected InvalidOptions, got {other:?}"),
        }
    }

    #[test]
    fn collections_are_validated_before_options() {
        let dataset = Dataset::default();
        match aggregate(&dataset, &AggregationOptions::new()).unwrap_err() {
            AggregationError::MissingSellers(_) => {}
            other => panic!("Expected MissingSellers, got {other:?}"),
        }
    }

    #[test]
    fn custom_strategies_are_used() {
        let dataset = ranked_dataset(&[10.0, 20.0]);
        let options = AggregationOptions::new()
            .with_revenue(|item: &LineItem, _: Option<&Product>| item.sale_price() * 2.0)
            .with_bonus(|rank: usize, _: usize, _: &SellerStats| (rank as f64 + 1.0) * 100.0);

        let reports = aggregate(&dataset, &options).unwrap();
        assert_eq!(reports[0].revenue, 40.0);
        assert_eq!(reports[0].bonus, 100.0);
        assert_eq!(reports[1].bonus, 200.0);
    }

    #[test]
    fn sharded_run_matches_sequential() {
        let dataset = ranked_dataset(&[5.0, 15.0, 25.0, 35.0, 45.0, 55.0, 65.0]);
        let sequential = aggregate(&dataset, &options()).unwrap();

        for shards in [0, 1, 2, 3, 16] {
            assert_eq!(aggregate_sharded(&dataset, &options(), shards).unwrap(), sequential);
        }
    }

    #[test]
    fn aggregation_is_deterministic() {
        let dataset = ranked_dataset(&[12.5, 12.5, 3.0, 99.99]);
        let first = aggregate(&dataset, &options()).unwrap();
        let second = aggregate(&dataset, &options()).unwrap();
        assert_eq!(first, second);

        // Equal profits keep input order.
        assert_eq!(first[1].seller_id.as_str(), "seller_0");
        assert_eq!(first[2].seller_id.as_str(), "seller_1");
    }

    #[cfg(test)]
    mod proptest_tests {
        use super::*;
        use crate::options::DEFAULT_TOP_PRODUCTS_LIMIT;
        use proptest::prelude::*;

        /// Integer prices and quantities with 0% or 50% discounts keep every sum
        /// exact, so sequential and sharded folds can be compared bit for bit.
        fn line_strategy() -> impl Strategy<Value = LineItem> {
            (0u32..15, 0u32..500, 0u32..20, prop_oneof![Just(0.0), Just(50.0)]).prop_map(
                |(sku, price, qty, discount)| {
                    LineItem::new(format!("SKU_{sku}"), f64::from(price), f64::from(qty))
                        .with_discount(discount)
                },
            )
        }

        fn record_strategy() -> impl Strategy<Value = PurchaseRecord> {
            (
                0u32..8,
                proptest::collection::vec(line_strategy(), 1..6),
                proptest::option::of(0u32..5000),
            )
                .prop_map(|(seller, items, total)| {
                    let record = PurchaseRecord::itemised(format!("seller_{seller}"), items);
                    match total {
                        Some(t) => record.with_total_amount(f64::from(t)),
                        None => record,
                    }
                })
        }

        fn dataset_strategy() -> impl Strategy<Value = Dataset> {
            (1u32..6, proptest::collection::vec(record_strategy(), 1..40)).prop_map(
                |(seller_count, purchase_records)| {
                    let sellers = (0..seller_count)
                        .map(|i| Seller::new(format!("seller_{i}"), "Seller", format!("{i}")))
                        .collect();
                    let products = (0..10u32)
                        .map(|i| {
                            Product::new(format!("SKU_{i}"), f64::from(i * 10), f64::from(i * 3))
                        })
                        .collect();
                    Dataset::new(sellers, products, purchase_records)
                },
            )
        }

        fn is_cents(value: f64) -> bool {
            (value * 100.0 - (value * 100.0).round()).abs() < 1e-6
        }

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 300,
                ..ProptestConfig::default()
            })]

            /// Property: one report per seller, ranked by profit, with rounded amounts.
            #[test]
            fn reports_are_complete_ranked_and_rounded(dataset in dataset_strategy()) {
                let reports = aggregate(&dataset, &options()).unwrap();

                prop_assert_eq!(reports.len(), dataset.sellers.len());
                for pair in reports.windows(2) {
                    prop_assert!(pair[0].profit >= pair[1].profit);
                }
                for report in &reports {
                    prop_assert!(is_cents(report.revenue));
                    prop_assert!(is_cents(report.profit));
                    prop_assert!(is_cents(report.bonus));
                    prop_assert!(report.top_products.len() <= DEFAULT_TOP_PRODUCTS_LIMIT);
                    for pair in report.top_products.windows(2) {
                        prop_assert!(pair[0].quantity >= pair[1].quantity);
                    }
                }
            }

            /// Property: sales counts add up to the records attributed to known sellers.
            #[test]
            fn sales_counts_cover_known_sellers(dataset in dataset_strategy()) {
                let reports = aggregate(&dataset, &options()).unwrap();
                let known = dataset
                    .purchase_records
                    .iter()
                    .filter(|r| dataset.sellers.iter().any(|s| s.id == r.seller_id))
                    .count() as u64;

                prop_assert_eq!(reports.iter().map(|r| r.sales_count).sum::<u64>(), known);
            }

            /// Property: sharded folding produces the same reports as a sequential fold.
            #[test]
            fn sharded_equals_sequential(dataset in dataset_strategy(), shards in 1usize..6) {
                let sequential = aggregate(&dataset, &options()).unwrap();
                let sharded = aggregate_sharded(&dataset, &options(), shards).unwrap();
                prop_assert_eq!(sequential, sharded);
            }
        }
    }
}
