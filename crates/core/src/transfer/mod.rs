//! Inter-branch stock transfer rules.

pub mod rules;
pub mod types;

pub use rules::{
    movements, reverse_movements, total_value, validate_lines, validate_transfer_transition,
    TransferValidationError,
};
pub use types::{StockMovement, TransferLine, TransferStatus, TransferTransitionError};
