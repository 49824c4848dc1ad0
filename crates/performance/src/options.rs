use std::sync::Arc;

use salesboard_core::{AggregationError, AggregationResult};

use crate::strategy::{BonusStrategy, RevenueStrategy};

/// Number of products reported per seller unless overridden.
pub const DEFAULT_TOP_PRODUCTS_LIMIT: usize = 10;

/// Aggregation configuration: the two mandatory strategies plus tuning knobs.
///
/// Options start empty; a run with either strategy unset fails with
/// [`AggregationError::InvalidOptions`].
#[derive(Clone)]
pub struct AggregationOptions {
    calculate_revenue: Option<Arc<dyn RevenueStrategy>>,
    calculate_bonus: Option<Arc<dyn BonusStrategy>>,
    top_products_limit: usize,
}

impl Default for AggregationOptions {
    fn default() -> Self {
        Self {
            calculate_revenue: None,
            calculate_bonus: None,
            top_products_limit: DEFAULT_TOP_PRODUCTS_LIMIT,
        }
    }
}

impl core::fmt::Debug for AggregationOptions {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AggregationOptions")
            .field("calculate_revenue", &self.calculate_revenue.is_some())
            .field("calculate_bonus", &self.calculate_bonus.is_some())
            .field("top_products_limit", &self.top_products_limit)
            .finish()
    }
}

impl AggregationOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_revenue(mut self, strategy: impl RevenueStrategy + 'static) -> Self {
        self.calculate_revenue = Some(Arc::new(strategy));
        self
    }

    pub fn with_bonus(mut self, strategy: impl BonusStrategy + 'static) -> Self {
        self.calculate_bonus = Some(Arc::new(strategy));
        self
    }

    pub fn with_top_products_limit(mut self, limit: usize) -> Self {
        self.top_products_limit = limit;
        self
    }

    pub fn top_products_limit(&self) -> usize {
        self.top_products_limit
    }

    /// Both strategies, or `InvalidOptions` naming the first one missing.
    pub fn strategies(&self) -> AggregationResult<(&dyn RevenueStrategy, &dyn BonusStrategy)> {
        let revenue = self
            .calculate_revenue
            .as_deref()
            .ok_or_else(|| AggregationError::invalid_options("calculate_revenue is not set"))?;
        let bonus = self
            .calculate_bonus
            .as_deref()
            .ok_or_else(|| AggregationError::invalid_options("calculate_bonus is not set"))?;
        Ok((revenue, bonus))
    }
}
