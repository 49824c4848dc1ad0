//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects carry no key of their own and are compared field by field,
/// e.g. a `{sku, quantity}` pair in a seller's top products or a product's
/// discount metadata.
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq)]
/// struct ProductQuantity {
///     sku: ProductKey,
///     quantity: f64,
/// }
///
/// impl ValueObject for ProductQuantity {}
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
