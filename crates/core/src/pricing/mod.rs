//! Price list eligibility, ranking, and price resolution.
//!
//! This module implements the price resolution engine:
//! - Context-based applicability filtering (branch, customer group, user, date)
//! - Deterministic priority ranking of overlapping lists
//! - First-match price resolution with catalog fallback
//! - Non-listed-product policy for sales document creation
//! - Error types for pricing operations

pub mod engine;
pub mod error;
pub mod policy;
pub mod types;

#[cfg(test)]
mod engine_props;

pub use engine::{applicable_price_lists, is_applicable, resolve_price};
pub use error::PricingError;
pub use policy::{evaluate_non_listed_policy, PolicyOutcome};
pub use types::{PriceListInfo, PricingContext, PricingWarning, ResolvedPrice};
