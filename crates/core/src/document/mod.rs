//! Document domain: kinds, lifecycle, totals, and input validation.
//!
//! Everything here is pure. Persistence, stock application, and balance
//! recomputation live in the repository layer, which calls into these
//! functions for every decision with a business rule behind it.

pub mod lifecycle;
pub mod totals;
pub mod types;
pub mod validation;

#[cfg(test)]
mod totals_props;

pub use lifecycle::{stock_effect, validate_transition, StockDirection, TransitionError};
pub use totals::{debt_amount, document_totals, line_total, payment_status, DocumentTotals, LineAmounts};
pub use types::{DocumentKind, DocumentStatus, PaymentMethod, PaymentStatus};
pub use validation::{validate_discount_ratio, validate_lines, DocumentValidationError};
