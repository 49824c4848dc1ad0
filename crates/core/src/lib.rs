//! `salesboard-core` — shared building blocks for seller performance reporting.
//!
//! This crate contains **pure** primitives (no IO): identifiers, the error
//! taxonomy and the money/number helpers every other crate leans on.

pub mod amount;
pub mod entity;
pub mod error;
pub mod id;
pub mod value_object;

pub use amount::{coerce_amount, coerce_key, parse_amount, round_money, sanitize_amount};
pub use entity::Entity;
pub use error::{AggregationError, AggregationResult};
pub use id::{ProductKey, SellerId};
pub use value_object::ValueObject;
