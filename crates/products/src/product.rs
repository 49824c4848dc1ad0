use serde::{Deserialize, Serialize};

use salesboard_core::{Entity, ProductKey, ValueObject};

/// Optional discount metadata attached to a catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DiscountMetadata {
    /// Percentage discount in `[0, 100]` (not enforced).
    pub percent: f64,
}

impl ValueObject for DiscountMetadata {}

/// Reference record: Product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub sku: ProductKey,
    #[serde(default)]
    pub name: Option<String>,
    /// Unit sale price.
    #[serde(default)]
    pub sale_price: f64,
    /// Unit purchase price (prime cost).
    #[serde(default)]
    pub purchase_price: f64,
    #[serde(default)]
    pub discount: Option<DiscountMetadata>,
}

impl Product {
    pub fn new(sku: impl Into<ProductKey>, sale_price: f64, purchase_price: f64) -> Self {
        Self {
            sku: sku.into(),
            name: None,
            sale_price,
            purchase_price,
            discount: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_discount(mut self, percent: f64) -> Self {
        self.discount = Some(DiscountMetadata { percent });
        self
    }

    /// Default discount percentage from the catalog entry (0 when absent).
    pub fn discount_percent(&self) -> f64 {
        self.discount.map(|d| d.percent).unwrap_or(0.0)
    }
}

impl Entity for Product {
    type Id = ProductKey;

    fn id(&self) -> &Self::Id {
        &self.sku
    }
}
