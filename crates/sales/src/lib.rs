//! Purchase records domain module.
//!
//! A purchase record attributes one transaction to a seller. It comes either in
//! a flat shape (one price/quantity/discount triple) or as a list of line
//! items, optionally with a precomputed total amount.

pub mod purchase;

pub use purchase::{LineItem, PurchaseLines, PurchaseRecord};
