//! Sellers domain module.
//!
//! Sellers are read-only reference data for aggregation: an identifier plus the
//! name parts used to label a seller's report.

pub mod seller;

pub use seller::Seller;
