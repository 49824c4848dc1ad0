use serde::{Deserialize, Serialize};

use salesboard_core::{ProductKey, SellerId, ValueObject};

/// A product and the cumulative quantity a seller sold of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductQuantity {
    pub sku: ProductKey,
    pub quantity: f64,
}

impl ValueObject for ProductQuantity {}

/// Output record: one seller's finalized performance.
///
/// Monetary fields are rounded to 2 decimal places; `top_products` is sorted
/// by quantity descending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SellerReport {
    pub seller_id: SellerId,
    pub name: String,
    pub revenue: f64,
    pub profit: f64,
    pub sales_count: u64,
    pub bonus: f64,
    pub top_products: Vec<ProductQuantity>,
}
