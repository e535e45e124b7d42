//! Document code formatting.
//!
//! Codes look like `SO-20260830-0001`: a kind prefix, the document date, and
//! a per-kind per-day counter. Counter allocation is a persistence concern;
//! this module only formats.

use chrono::NaiveDate;

use crate::document::DocumentKind;

/// Prefix for inter-branch transfer codes.
pub const TRANSFER_PREFIX: &str = "TR";

/// Formats a document code from its parts.
#[must_use]
pub fn format_code(prefix: &str, date: NaiveDate, sequence: i64) -> String {
    format!("{prefix}-{}-{sequence:04}", date.format("%Y%m%d"))
}

/// Formats a code for a commercial document kind.
#[must_use]
pub fn document_code(kind: DocumentKind, date: NaiveDate, sequence: i64) -> String {
    format_code(kind.code_prefix(), date, sequence)
}

/// Formats a code for an inter-branch transfer.
#[must_use]
pub fn transfer_code(date: NaiveDate, sequence: i64) -> String {
    format_code(TRANSFER_PREFIX, date, sequence)
}
