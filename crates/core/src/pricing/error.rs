//! Error types for pricing operations.

use thiserror::Error;
use vendra_shared::types::ProductId;

/// Errors raised during price resolution and policy checks.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PricingError {
    /// The primary price list forbids products it does not carry.
    #[error(
        "Product {product_code} ({product_id}) is not on price list \"{price_list_name}\", which does not allow non-listed products"
    )]
    ProductNotOnPriceList {
        /// The offending product.
        product_id: ProductId,
        /// Product code, for the human-readable message.
        product_code: String,
        /// The primary price list name.
        price_list_name: String,
    },
}
