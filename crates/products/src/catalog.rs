use std::collections::HashMap;

use salesboard_core::{Entity, ProductKey};

use crate::product::Product;

/// Read-only product lookup keyed by SKU.
///
/// The first product registered under a key wins; later duplicates are
/// ignored. Lookups for unknown keys return `None`, and the cost helpers
/// treat them as zero.
#[derive(Debug, Clone, Default)]
pub struct ProductCatalog {
    products: HashMap<ProductKey, Product>,
}

impl ProductCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a product. Returns `false` when the key is already taken.
    pub fn insert(&mut self, product: Product) -> bool {
        if self.products.contains_key(product.id()) {
            return false;
        }
        self.products.insert(product.id().clone(), product);
        true
    }

    pub fn get(&self, sku: &ProductKey) -> Option<&Product> {
        self.products.get(sku)
    }

    /// Unit purchase price for `sku`, `0.0` when unresolved.
    pub fn unit_cost(&self, sku: Option<&ProductKey>) -> f64 {
        sku.and_then(|k| self.get(k))
            .map(|p| p.purchase_price)
            .unwrap_or(0.0)
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

impl<'a> FromIterator<&'a Product> for ProductCatalog {
    fn from_iter<I: IntoIterator<Item = &'a Product>>(iter: I) -> Self {
        let mut catalog = Self::new();
        for product in iter {
            catalog.insert(product.clone());
        }
        catalog
    }
}
