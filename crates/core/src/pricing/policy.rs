//! Non-listed-product policy for sales document creation.
//!
//! When a sales document is created against a primary price list (the
//! highest-priority applicable list), products missing from that list are
//! governed by the list's `allow_non_listed` / `warn_non_listed` flags.

use vendra_shared::types::ProductId;

use super::error::PricingError;
use super::types::{PriceListInfo, PricingWarning, ResolvedPrice};

/// What the policy decided for one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyOutcome {
    /// The product is listed on the primary list (or there is no primary list).
    Listed,
    /// The product is missing but allowed; optionally with a warning to return.
    AllowedNonListed(Option<PricingWarning>),
}

/// Evaluates the non-listed-product policy for one resolved line.
///
/// The product counts as non-listed when its resolved price did not come from
/// the primary list. Creation fails when the primary list forbids non-listed
/// products; otherwise a warning is produced if the list asks for one.
///
/// # Errors
///
/// Returns [`PricingError::ProductNotOnPriceList`] when the primary list has
/// `allow_non_listed = false` and the product has no entry on it.
pub fn evaluate_non_listed_policy(
    primary: &PriceListInfo,
    product_id: ProductId,
    product_code: &str,
    resolved: &ResolvedPrice,
) -> Result<PolicyOutcome, PricingError> {
    if resolved.price_list_id == Some(primary.id) {
        return Ok(PolicyOutcome::Listed);
    }

    if !primary.allow_non_listed {
        return Err(PricingError::ProductNotOnPriceList {
            product_id,
            product_code: product_code.to_string(),
            price_list_name: primary.name.clone(),
        });
    }

    let warning = primary.warn_non_listed.then(|| PricingWarning {
        product_id,
        product_code: product_code.to_string(),
        price_list_id: primary.id,
        message: format!(
            "Product {product_code} is not on price list \"{}\"; using fallback price",
            primary.name
        ),
    });

    Ok(PolicyOutcome::AllowedNonListed(warning))
}
