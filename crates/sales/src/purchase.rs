use serde::{Deserialize, Serialize};

use salesboard_core::{ProductKey, SellerId, sanitize_amount};

/// A single product/quantity/discount entry within a purchase record.
///
/// Every numeric field is optional; accessors report missing or non-finite
/// values as `0.0`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<ProductKey>,
    /// Unit sale price charged on this line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sale_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,
    /// Percentage discount, e.g. `10.0` for 10%.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount: Option<f64>,
}

impl LineItem {
    pub fn new(sku: impl Into<ProductKey>, sale_price: f64, quantity: f64) -> Self {
        Self {
            sku: Some(sku.into()),
            sale_price: Some(sale_price),
            quantity: Some(quantity),
            discount: None,
        }
    }

    pub fn with_discount(mut self, discount: f64) -> Self {
        self.discount = Some(discount);
        self
    }

    pub fn sale_price(&self) -> f64 {
        self.sale_price.map(sanitize_amount).unwrap_or(0.0)
    }

    pub fn quantity(&self) -> f64 {
        self.quantity.map(sanitize_amount).unwrap_or(0.0)
    }

    pub fn discount(&self) -> f64 {
        self.discount.map(sanitize_amount).unwrap_or(0.0)
    }
}

/// Shape of a purchase record's contents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PurchaseLines {
    /// A list of line items.
    Itemised { items: Vec<LineItem> },
    /// A single price/quantity/discount triple carried on the record itself.
    Flat(LineItem),
}

/// Input record: one transaction attributed to a seller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receipt_id: Option<String>,
    pub seller_id: SellerId,
    /// Precomputed total; when present it replaces the per-line revenue sum.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_amount: Option<f64>,
    #[serde(flatten)]
    pub lines: PurchaseLines,
}

impl PurchaseRecord {
    pub fn itemised(seller_id: impl Into<SellerId>, items: Vec<LineItem>) -> Self {
        Self {
            receipt_id: None,
            seller_id: seller_id.into(),
            total_amount: None,
            lines: PurchaseLines::Itemised { items },
        }
    }

    pub fn flat(seller_id: impl Into<SellerId>, line: LineItem) -> Self {
        Self {
            receipt_id: None,
            seller_id: seller_id.into(),
            total_amount: None,
            lines: PurchaseLines::Flat(line),
        }
    }

    pub fn with_receipt_id(mut self, receipt_id: impl Into<String>) -> Self {
        self.receipt_id = Some(receipt_id.into());
        self
    }

    pub fn with_total_amount(mut self, total_amount: f64) -> Self {
        self.total_amount = Some(total_amount);
        self
    }

    /// The record's line items; a flat record yields exactly one.
    pub fn line_items(&self) -> &[LineItem] {
        match &self.lines {
            PurchaseLines::Itemised { items } => items,
            PurchaseLines::Flat(line) => core::slice::from_ref(line),
        }
    }

    /// The precomputed total, only when it is a usable number.
    pub fn explicit_total(&self) -> Option<f64> {
        self.total_amount.filter(|t| t.is_finite())
    }
}
