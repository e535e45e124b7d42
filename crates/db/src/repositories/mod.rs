//! Repository abstractions for data access.
//!
//! Repositories own the atomic transaction boundary: every public mutation
//! opens one database transaction, threads it through private helpers, and
//! commits or rolls back as a unit. Optimistic guarded updates surface lost
//! races as conflict errors, which the retry wrapper re-runs a bounded
//! number of times with a fresh transaction.

pub mod balance;
pub mod catalog;
pub mod counterparty;
pub mod document;
pub mod inventory;
pub mod pricing;
pub mod sequence;
pub mod transfer;

pub use balance::BalanceError;
pub use catalog::CatalogError;
pub use counterparty::CounterpartyError;
pub use document::{
    CreateDocumentInput, CreateDocumentResult, DocumentError, DocumentRepository,
    DocumentWithLines, LineInput, PaymentInput, UpdateDocumentInput,
};
pub use inventory::InventoryError;
pub use pricing::{PricingRepoError, PricingRepository};
pub use sequence::SequenceError;
pub use transfer::{
    CreateTransferInput, TransferError, TransferLineInput, TransferRepository,
    TransferWithDetails, UpdateTransferInput,
};

use std::future::Future;

/// Default number of attempts for operations that can lose an optimistic
/// write race.
pub const DEFAULT_CONFLICT_RETRIES: u32 = 3;

/// Errors that may be worth retrying with a fresh transaction.
pub(crate) trait ConflictCheck {
    fn is_conflict(&self) -> bool;
}

/// Runs `operation` up to `attempts` times, retrying only on conflict.
///
/// Each invocation must open its own transaction; the wrapper never reuses
/// state across attempts.
pub(crate) async fn with_conflict_retry<T, E, F, Fut>(
    attempts: u32,
    mut operation: F,
) -> Result<T, E>
where
    E: ConflictCheck + std::fmt::Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut attempt = 0;
    loop {
        attempt += 1;
        match operation().await {
            Err(err) if err.is_conflict() && attempt < attempts.max(1) => {
                tracing::warn!(attempt, error = %err, "write conflict, retrying");
            }
            other => return other,
        }
    }
}

/// Best-effort detection of a unique constraint violation across backends.
pub(crate) fn is_unique_violation(err: &sea_orm::DbErr) -> bool {
    let message = err.to_string().to_lowercase();
    message.contains("unique") || message.contains("duplicate")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[derive(Debug, thiserror::Error)]
    enum FakeError {
        #[error("conflict")]
        Conflict,
        #[error("fatal")]
        Fatal,
    }

    impl ConflictCheck for FakeError {
        fn is_conflict(&self) -> bool {
            matches!(self, Self::Conflict)
        }
    }

    #[tokio::test]
    async fn test_retry_gives_up_after_attempts() {
        let calls = AtomicU32::new(0);
        let result: Result<(), FakeError> = with_conflict_retry(3, || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(FakeError::Conflict) }
        })
        .await;

        assert!(matches!(result, Err(FakeError::Conflict)));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_retry_succeeds_after_transient_conflict() {
        let calls = AtomicU32::new(0);
        let result: Result<u32, FakeError> = with_conflict_retry(3, || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n == 0 {
                    Err(FakeError::Conflict)
                } else {
                    Ok(n)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_non_conflict_errors_are_not_retried() {
        let calls = AtomicU32::new(0);
        let result: Result<(), FakeError> = with_conflict_retry(3, || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(FakeError::Fatal) }
        })
        .await;

        assert!(matches!(result, Err(FakeError::Fatal)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
