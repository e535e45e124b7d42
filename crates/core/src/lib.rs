//! Core business logic for Vendra.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `pricing` - Price list eligibility, ranking, and price resolution
//! - `document` - Commercial document lifecycle, line-item calculator, validation
//! - `transfer` - Inter-branch stock transfer rules
//! - `balance` - Counterparty balance aggregation
//! - `sequence` - Document code formatting

pub mod balance;
pub mod document;
pub mod pricing;
pub mod sequence;
pub mod transfer;
