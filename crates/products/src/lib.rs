//! Products domain module.
//!
//! Products are read-only reference data: unit sale price, unit purchase price
//! (prime cost) and optional discount metadata, looked up by SKU while
//! purchase records are folded.

pub mod catalog;
pub mod product;

pub use catalog::ProductCatalog;
pub use product::{DiscountMetadata, Product};
