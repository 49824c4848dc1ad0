//! Aggregation input: the three collections, typed or straight from JSON.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use salesboard_core::{
    AggregationError, AggregationResult, ProductKey, SellerId, coerce_amount, coerce_key,
    parse_amount,
};
use salesboard_parties::Seller;
use salesboard_products::{DiscountMetadata, Product, ProductCatalog};
use salesboard_sales::{LineItem, PurchaseLines, PurchaseRecord};

/// Already-loaded input for one aggregation run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub sellers: Vec<Seller>,
    pub products: Vec<Product>,
    pub purchase_records: Vec<PurchaseRecord>,
}

impl Dataset {
    pub fn new(
        sellers: Vec<Seller>,
        products: Vec<Product>,
        purchase_records: Vec<PurchaseRecord>,
    ) -> Self {
        Self {
            sellers,
            products,
            purchase_records,
        }
    }

    /// Every collection must be non-empty.
    pub fn validate(&self) -> AggregationResult<()> {
        if self.sellers.is_empty() {
            return Err(AggregationError::missing_sellers("collection is empty"));
        }
        if self.products.is_empty() {
            return Err(AggregationError::missing_products("collection is empty"));
        }
        if self.purchase_records.is_empty() {
            return Err(AggregationError::missing_purchase_records(
                "collection is empty",
            ));
        }
        Ok(())
    }

    pub fn catalog(&self) -> ProductCatalog {
        self.products.iter().collect()
    }

    /// Build a dataset from an in-memory JSON document.
    ///
    /// The document must be an object holding `sellers`, `products` and
    /// `purchase_records` arrays. Field values are read leniently: numeric
    /// fields accept numbers or numeric strings and fall back to zero, keys
    /// accept strings or numbers. Entries missing their key are kept with a
    /// blank key, which never matches anything during aggregation.
    pub fn from_json(value: &JsonValue) -> AggregationResult<Self> {
        let root = value.as_object().ok_or_else(|| {
            AggregationError::invalid_input(format!(
                "expected an object, found {}",
                json_kind(value)
            ))
        })?;

        let sellers = collection(root, "sellers", AggregationError::MissingSellers)?;
        let products = collection(root, "products", AggregationError::MissingProducts)?;
        let purchase_records = collection(
            root,
            "purchase_records",
            AggregationError::MissingPurchaseRecords,
        )?;

        Ok(Self {
            sellers: sellers.iter().map(seller_from_json).collect(),
            products: products.iter().map(product_from_json).collect(),
            purchase_records: purchase_records.iter().map(record_from_json).collect(),
        })
    }
}

fn collection<'a>(
    root: &'a Map<String, JsonValue>,
    field: &str,
    error: fn(String) -> AggregationError,
) -> AggregationResult<&'a Vec<JsonValue>> {
    let value = root
        .get(field)
        .filter(|v| !v.is_null())
        .ok_or_else(|| error(format!("`{field}` is absent")))?;
    let items = value.as_array().ok_or_else(|| {
        error(format!(
            "`{field}` must be an array, found {}",
            json_kind(value)
        ))
    })?;
    if items.is_empty() {
        return Err(error(format!("`{field}` is empty")));
    }
    Ok(items)
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}

fn key(value: &JsonValue, field: &str) -> Option<String> {
    value.get(field).and_then(coerce_key)
}

fn text(value: &JsonValue, field: &str) -> String {
    value
        .get(field)
        .and_then(JsonValue::as_str)
        .unwrap_or_default()
        .to_string()
}

fn amount(value: &JsonValue, field: &str) -> f64 {
    value.get(field).map(coerce_amount).unwrap_or(0.0)
}

fn optional_amount(value: &JsonValue, field: &str) -> Option<f64> {
    value.get(field).filter(|v| !v.is_null()).map(coerce_amount)
}

fn seller_from_json(value: &JsonValue) -> Seller {
    Seller::new(
        key(value, "id").unwrap_or_default(),
        text(value, "first_name"),
        text(value, "last_name"),
    )
}

fn product_from_json(value: &JsonValue) -> Product {
    Product {
        sku: ProductKey::new(key(value, "sku").unwrap_or_default()),
        name: value.get("name").and_then(JsonValue::as_str).map(str::to_string),
        sale_price: amount(value, "sale_price"),
        purchase_price: amount(value, "purchase_price"),
        discount: optional_amount(value, "discount").map(|percent| DiscountMetadata { percent }),
    }
}

fn line_from_json(value: &JsonValue) -> LineItem {
    LineItem {
        sku: key(value, "sku").map(ProductKey::new),
        sale_price: optional_amount(value, "sale_price"),
        quantity: optional_amount(value, "quantity"),
        discount: optional_amount(value, "discount"),
    }
}

fn record_from_json(value: &JsonValue) -> PurchaseRecord {
    let lines = match value.get("items").and_then(JsonValue::as_array) {
        Some(items) => PurchaseLines::Itemised {
            items: items.iter().map(line_from_json).collect(),
        },
        None => PurchaseLines::Flat(line_from_json(value)),
    };

    PurchaseRecord {
        receipt_id: key(value, "receipt_id"),
        seller_id: SellerId::new(key(value, "seller_id").unwrap_or_default()),
        total_amount: value.get("total_amount").and_then(parse_amount),
        lines,
    }
}
