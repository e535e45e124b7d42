//! Document ledger: orders, invoices, and purchase orders.
//!
//! Every public mutation runs inside one database transaction with bounded
//! retry on write conflicts. The sequencing per operation is fixed: validate,
//! mutate rows, adjust inventory, recompute the counterparty balance, commit.
//! Stock handling on edits is reverse-then-reapply: the old lines' effect is
//! undone before the new lines' effect is applied, so an idempotent update
//! never double-counts.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use vendra_core::document::{
    debt_amount, document_totals, line_total, stock_effect, validate_discount_ratio,
    validate_lines, validate_transition, DocumentKind, DocumentStatus, DocumentValidationError,
    LineAmounts, PaymentMethod, StockDirection, TransitionError,
};
use vendra_core::pricing::{
    evaluate_non_listed_policy, PolicyOutcome, PricingError, PricingWarning,
};
use vendra_core::sequence::document_code;
use vendra_shared::types::{
    BranchId, CounterpartyId, DocumentId, PageRequest, PageResponse, PaymentId, ProductId, UserId,
};
use vendra_shared::AppError;

use crate::entities::{documents, line_items, payments};

use super::balance::{self, BalanceError};
use super::catalog::{self, CatalogError};
use super::counterparty::{self, CounterpartyError};
use super::inventory::{self, InventoryError};
use super::pricing::{self, PricingRepoError};
use super::sequence::{self, SequenceError};
use super::{with_conflict_retry, ConflictCheck, DEFAULT_CONFLICT_RETRIES};

/// Error types for document operations.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    /// Document not found.
    #[error("Document not found: {0}")]
    NotFound(Uuid),

    /// Payment not found on the document.
    #[error("Payment not found: {0}")]
    PaymentNotFound(Uuid),

    /// Referenced catalog record missing.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Referenced counterparty missing.
    #[error(transparent)]
    Counterparty(#[from] CounterpartyError),

    /// Rejected input.
    #[error(transparent)]
    Validation(#[from] DocumentValidationError),

    /// Price list policy violation.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// Status transition not allowed.
    #[error(transparent)]
    Transition(#[from] TransitionError),

    /// Cancelled documents must be reopened before editing.
    #[error("Document {0} is cancelled and cannot be edited")]
    EditCancelled(Uuid),

    /// Payments only apply to sales documents.
    #[error("Cannot record a payment on a {0:?}")]
    PaymentNotSupported(DocumentKind),

    /// Payments on cancelled documents are rejected, in both directions.
    #[error("Cannot modify payments on cancelled document {0}")]
    PaymentOnCancelled(Uuid),

    /// Payment amounts must be strictly positive.
    #[error("Payment amount must be greater than zero, got {0}")]
    InvalidPaymentAmount(Decimal),

    /// Pricing data access failure.
    #[error(transparent)]
    PricingData(#[from] PricingRepoError),

    /// Inventory adjustment failure.
    #[error(transparent)]
    Inventory(#[from] InventoryError),

    /// Sequence allocation failure.
    #[error(transparent)]
    Sequence(#[from] SequenceError),

    /// Balance recomputation failure.
    #[error(transparent)]
    Balance(#[from] BalanceError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl ConflictCheck for DocumentError {
    fn is_conflict(&self) -> bool {
        match self {
            Self::Inventory(err) => err.is_conflict(),
            Self::Sequence(err) => err.is_conflict(),
            _ => false,
        }
    }
}

impl From<DocumentError> for AppError {
    fn from(err: DocumentError) -> Self {
        match err {
            DocumentError::NotFound(_) | DocumentError::PaymentNotFound(_) => {
                Self::NotFound(err.to_string())
            }
            DocumentError::Validation(_)
            | DocumentError::Pricing(_)
            | DocumentError::InvalidPaymentAmount(_) => Self::Validation(err.to_string()),
            DocumentError::Transition(_)
            | DocumentError::EditCancelled(_)
            | DocumentError::PaymentNotSupported(_)
            | DocumentError::PaymentOnCancelled(_) => Self::BusinessRule(err.to_string()),
            DocumentError::Catalog(inner) => inner.into(),
            DocumentError::Counterparty(inner) => inner.into(),
            DocumentError::PricingData(inner) => inner.into(),
            DocumentError::Inventory(inner) => inner.into(),
            DocumentError::Sequence(inner) => inner.into(),
            DocumentError::Balance(inner) => inner.into(),
            DocumentError::Database(inner) => Self::Database(inner.to_string()),
        }
    }
}

/// One requested line of a document.
#[derive(Debug, Clone)]
pub struct LineInput {
    /// The product to sell or buy.
    pub product_id: ProductId,
    /// Quantity, strictly positive.
    pub quantity: Decimal,
    /// Explicit unit price. When absent, sales documents resolve it through
    /// the price lists and purchase orders fall back to the catalog base
    /// price.
    pub unit_price: Option<Decimal>,
    /// Flat line discount.
    pub discount_amount: Decimal,
    /// Percentage line discount, 0..=100.
    pub discount_ratio: Decimal,
}

/// Input for creating a document. New documents always start `open`.
#[derive(Debug, Clone)]
pub struct CreateDocumentInput {
    /// Document kind.
    pub kind: DocumentKind,
    /// Customer (sales) or supplier (purchasing).
    pub counterparty_id: CounterpartyId,
    /// Branch the document belongs to.
    pub branch_id: BranchId,
    /// Acting user.
    pub created_by: UserId,
    /// Document date; also the pricing effective date.
    pub document_date: NaiveDate,
    /// Flat document discount.
    pub discount_amount: Decimal,
    /// Percentage document discount, 0..=100.
    pub discount_ratio: Decimal,
    /// The lines, at least one.
    pub lines: Vec<LineInput>,
}

/// Input for a full-replace update of an existing document.
#[derive(Debug, Clone)]
pub struct UpdateDocumentInput {
    /// New document date.
    pub document_date: NaiveDate,
    /// New flat document discount.
    pub discount_amount: Decimal,
    /// New percentage document discount.
    pub discount_ratio: Decimal,
    /// The full replacement line set.
    pub lines: Vec<LineInput>,
}

/// Input for recording a payment against a sales document.
#[derive(Debug, Clone)]
pub struct PaymentInput {
    /// Amount paid, strictly positive.
    pub amount: Decimal,
    /// Date of payment.
    pub paid_on: NaiveDate,
    /// How it was paid.
    pub method: PaymentMethod,
    /// Acting user.
    pub recorded_by: UserId,
}

/// A document with its lines and payments.
#[derive(Debug, Clone)]
pub struct DocumentWithLines {
    /// The document header.
    pub document: documents::Model,
    /// Lines in position order.
    pub lines: Vec<line_items::Model>,
    /// Payments in recording order.
    pub payments: Vec<payments::Model>,
}

/// Creation result: the document plus any non-fatal pricing warnings.
#[derive(Debug, Clone)]
pub struct CreateDocumentResult {
    /// The created document.
    pub document: DocumentWithLines,
    /// Non-listed-product warnings; never persisted.
    pub warnings: Vec<PricingWarning>,
}

/// A line ready for insertion, with product snapshot and computed total.
struct PreparedLine {
    product_id: Uuid,
    product_code: String,
    product_name: String,
    quantity: Decimal,
    unit_price: Decimal,
    discount_amount: Decimal,
    discount_ratio: Decimal,
    line_total: Decimal,
}

/// Document repository owning the transaction boundary for all document
/// mutations.
#[derive(Debug, Clone)]
pub struct DocumentRepository {
    db: DatabaseConnection,
    retries: u32,
}

impl DocumentRepository {
    /// Creates a new document repository with the default conflict retry
    /// budget.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            retries: DEFAULT_CONFLICT_RETRIES,
        }
    }

    /// Overrides the conflict retry budget.
    #[must_use]
    pub const fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    /// Creates a document with resolved prices, an allocated code, stock
    /// effects, and a recomputed counterparty balance.
    ///
    /// # Errors
    ///
    /// `NotFound` for missing product/counterparty/branch/user, `Validation`
    /// for bad lines or discounts, `Pricing` when the primary price list
    /// forbids a non-listed product, or a database error.
    pub async fn create(
        &self,
        input: CreateDocumentInput,
    ) -> Result<CreateDocumentResult, DocumentError> {
        with_conflict_retry(self.retries, || self.create_inner(&input)).await
    }

    /// Replaces a document's date, discounts, and full line set.
    ///
    /// Stock handling is reverse-then-reapply against the document's current
    /// status, so repeating the same update does not double-count inventory.
    ///
    /// # Errors
    ///
    /// `NotFound` when the document or a referenced product is missing,
    /// `EditCancelled` for cancelled documents, `Validation`/`Pricing` as in
    /// creation, or a database error.
    pub async fn update(
        &self,
        document_id: DocumentId,
        input: UpdateDocumentInput,
    ) -> Result<DocumentWithLines, DocumentError> {
        with_conflict_retry(self.retries, || self.update_inner(document_id, &input)).await
    }

    /// Deletes a document with its lines and payments, reversing any stock
    /// effect first.
    ///
    /// # Errors
    ///
    /// `NotFound` when the document is missing, or a database error.
    pub async fn remove(&self, document_id: DocumentId) -> Result<(), DocumentError> {
        with_conflict_retry(self.retries, || self.remove_inner(document_id)).await
    }

    /// Moves a document to a new status, reversing and reapplying stock
    /// effects as the status matrix dictates.
    ///
    /// # Errors
    ///
    /// `NotFound` when the document is missing, `Transition` when the matrix
    /// forbids the move, or a database error.
    pub async fn transition(
        &self,
        document_id: DocumentId,
        to: DocumentStatus,
    ) -> Result<DocumentWithLines, DocumentError> {
        with_conflict_retry(self.retries, || self.transition_inner(document_id, to)).await
    }

    /// Records a payment against a sales document and refreshes the derived
    /// amounts.
    ///
    /// # Errors
    ///
    /// `PaymentNotSupported` for purchase orders, `PaymentOnCancelled` for
    /// cancelled documents, `InvalidPaymentAmount` for non-positive amounts,
    /// `NotFound` when the document is missing, or a database error.
    pub async fn record_payment(
        &self,
        document_id: DocumentId,
        input: PaymentInput,
    ) -> Result<DocumentWithLines, DocumentError> {
        with_conflict_retry(self.retries, || {
            self.record_payment_inner(document_id, &input)
        })
        .await
    }

    /// Removes a payment and refreshes the derived amounts.
    ///
    /// # Errors
    ///
    /// `NotFound` when the document is missing, `PaymentNotFound` when the
    /// payment does not belong to it, `PaymentOnCancelled` for cancelled
    /// documents, or a database error.
    pub async fn remove_payment(
        &self,
        document_id: DocumentId,
        payment_id: PaymentId,
    ) -> Result<DocumentWithLines, DocumentError> {
        with_conflict_retry(self.retries, || {
            self.remove_payment_inner(document_id, payment_id)
        })
        .await
    }

    /// Loads a document with its lines and payments.
    ///
    /// # Errors
    ///
    /// `NotFound` when the document is missing, or a database error.
    pub async fn get(&self, document_id: DocumentId) -> Result<DocumentWithLines, DocumentError> {
        let document = documents::Entity::find_by_id(document_id.into_inner())
            .one(&self.db)
            .await?
            .ok_or(DocumentError::NotFound(document_id.into_inner()))?;
        self.assemble(&self.db, document).await
    }

    /// Lists documents, optionally filtered by kind, newest first.
    ///
    /// # Errors
    ///
    /// Returns a database error if the query fails.
    pub async fn list(
        &self,
        kind: Option<DocumentKind>,
        page: PageRequest,
    ) -> Result<PageResponse<documents::Model>, DocumentError> {
        let mut query = documents::Entity::find();
        if let Some(kind) = kind {
            query = query.filter(documents::Column::Kind.eq(
                crate::entities::sea_orm_active_enums::DocKind::from(kind),
            ));
        }

        let total = query.clone().count(&self.db).await?;
        let data = query
            .order_by_desc(documents::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;

        Ok(PageResponse::new(data, page.page, page.per_page, total))
    }

    async fn create_inner(
        &self,
        input: &CreateDocumentInput,
    ) -> Result<CreateDocumentResult, DocumentError> {
        let txn = self.db.begin().await?;

        validate_discount_ratio(input.discount_ratio)?;
        if input.lines.is_empty() {
            return Err(DocumentValidationError::EmptyLines.into());
        }

        counterparty::require_counterparty(&txn, input.counterparty_id).await?;
        catalog::require_branch(&txn, input.branch_id).await?;
        catalog::require_user(&txn, input.created_by).await?;

        let (prepared, warnings) = prepare_lines(
            &txn,
            input.kind,
            input.branch_id,
            input.counterparty_id,
            input.created_by,
            input.document_date,
            &input.lines,
        )
        .await?;

        let line_totals: Vec<Decimal> = prepared.iter().map(|line| line.line_total).collect();
        let totals = document_totals(&line_totals, input.discount_amount, input.discount_ratio);

        let sequence_value =
            sequence::allocate(&txn, input.kind.code_prefix(), input.document_date).await?;
        let code = document_code(input.kind, input.document_date, sequence_value);

        let now = Utc::now();
        let document_id = DocumentId::new();
        let document = documents::ActiveModel {
            id: Set(document_id.into_inner()),
            code: Set(code.clone()),
            kind: Set(input.kind.into()),
            counterparty_id: Set(input.counterparty_id.into_inner()),
            branch_id: Set(input.branch_id.into_inner()),
            created_by: Set(input.created_by.into_inner()),
            document_date: Set(input.document_date),
            discount_amount: Set(input.discount_amount),
            discount_ratio: Set(input.discount_ratio),
            subtotal: Set(totals.subtotal),
            discount_total: Set(totals.discount_total),
            grand_total: Set(totals.grand_total),
            paid_amount: Set(Decimal::ZERO),
            debt_amount: Set(debt_amount(totals.grand_total, Decimal::ZERO)),
            status: Set(DocumentStatus::Open.into()),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let document = document.insert(&txn).await?;

        let lines = insert_lines(&txn, document.id, &prepared).await?;

        apply_stock(
            &txn,
            input.kind,
            DocumentStatus::Open,
            input.branch_id,
            &prepared,
            false,
        )
        .await?;

        balance::recompute(&txn, input.counterparty_id).await?;
        txn.commit().await?;

        tracing::info!(
            document_id = %document_id,
            code = %code,
            kind = ?input.kind,
            "created document"
        );

        Ok(CreateDocumentResult {
            document: DocumentWithLines {
                document,
                lines,
                payments: Vec::new(),
            },
            warnings,
        })
    }

    async fn update_inner(
        &self,
        document_id: DocumentId,
        input: &UpdateDocumentInput,
    ) -> Result<DocumentWithLines, DocumentError> {
        let txn = self.db.begin().await?;

        let document = require_document(&txn, document_id).await?;
        let kind: DocumentKind = document.kind.into();
        let status: DocumentStatus = document.status.into();
        if status == DocumentStatus::Cancelled {
            return Err(DocumentError::EditCancelled(document.id));
        }

        validate_discount_ratio(input.discount_ratio)?;
        if input.lines.is_empty() {
            return Err(DocumentValidationError::EmptyLines.into());
        }

        let old_lines = load_lines(&txn, document.id).await?;
        let old_prepared = as_prepared(&old_lines);
        apply_stock(
            &txn,
            kind,
            status,
            BranchId::from_uuid(document.branch_id),
            &old_prepared,
            true,
        )
        .await?;

        line_items::Entity::delete_many()
            .filter(line_items::Column::DocumentId.eq(document.id))
            .exec(&txn)
            .await?;

        let (prepared, _warnings) = prepare_lines(
            &txn,
            kind,
            BranchId::from_uuid(document.branch_id),
            CounterpartyId::from_uuid(document.counterparty_id),
            UserId::from_uuid(document.created_by),
            input.document_date,
            &input.lines,
        )
        .await?;

        let line_totals: Vec<Decimal> = prepared.iter().map(|line| line.line_total).collect();
        let totals = document_totals(&line_totals, input.discount_amount, input.discount_ratio);
        let paid = sum_payments(&txn, document.id).await?;

        let mut active: documents::ActiveModel = document.clone().into();
        active.document_date = Set(input.document_date);
        active.discount_amount = Set(input.discount_amount);
        active.discount_ratio = Set(input.discount_ratio);
        active.subtotal = Set(totals.subtotal);
        active.discount_total = Set(totals.discount_total);
        active.grand_total = Set(totals.grand_total);
        active.paid_amount = Set(paid);
        active.debt_amount = Set(debt_amount(totals.grand_total, paid));
        active.updated_at = Set(Utc::now());
        let document = active.update(&txn).await?;

        let lines = insert_lines(&txn, document.id, &prepared).await?;

        apply_stock(
            &txn,
            kind,
            status,
            BranchId::from_uuid(document.branch_id),
            &prepared,
            false,
        )
        .await?;

        balance::recompute(&txn, CounterpartyId::from_uuid(document.counterparty_id)).await?;
        txn.commit().await?;

        tracing::info!(document_id = %document_id, code = %document.code, "updated document");

        let payments = load_payments(&self.db, document.id).await?;
        Ok(DocumentWithLines {
            document,
            lines,
            payments,
        })
    }

    async fn remove_inner(&self, document_id: DocumentId) -> Result<(), DocumentError> {
        let txn = self.db.begin().await?;

        let document = require_document(&txn, document_id).await?;
        let kind: DocumentKind = document.kind.into();
        let status: DocumentStatus = document.status.into();

        let old_lines = load_lines(&txn, document.id).await?;
        let old_prepared = as_prepared(&old_lines);
        apply_stock(
            &txn,
            kind,
            status,
            BranchId::from_uuid(document.branch_id),
            &old_prepared,
            true,
        )
        .await?;

        payments::Entity::delete_many()
            .filter(payments::Column::DocumentId.eq(document.id))
            .exec(&txn)
            .await?;
        line_items::Entity::delete_many()
            .filter(line_items::Column::DocumentId.eq(document.id))
            .exec(&txn)
            .await?;
        documents::Entity::delete_by_id(document.id).exec(&txn).await?;

        balance::recompute(&txn, CounterpartyId::from_uuid(document.counterparty_id)).await?;
        txn.commit().await?;

        tracing::info!(document_id = %document_id, code = %document.code, "removed document");
        Ok(())
    }

    async fn transition_inner(
        &self,
        document_id: DocumentId,
        to: DocumentStatus,
    ) -> Result<DocumentWithLines, DocumentError> {
        let txn = self.db.begin().await?;

        let document = require_document(&txn, document_id).await?;
        let kind: DocumentKind = document.kind.into();
        let from: DocumentStatus = document.status.into();
        validate_transition(kind, from, to)?;

        let lines = load_lines(&txn, document.id).await?;
        let prepared = as_prepared(&lines);
        let branch = BranchId::from_uuid(document.branch_id);

        apply_stock(&txn, kind, from, branch, &prepared, true).await?;
        apply_stock(&txn, kind, to, branch, &prepared, false).await?;

        let mut active: documents::ActiveModel = document.clone().into();
        active.status = Set(to.into());
        active.updated_at = Set(Utc::now());
        let document = active.update(&txn).await?;

        balance::recompute(&txn, CounterpartyId::from_uuid(document.counterparty_id)).await?;
        txn.commit().await?;

        tracing::info!(
            document_id = %document_id,
            code = %document.code,
            from = ?from,
            to = ?to,
            "transitioned document"
        );

        let payments = load_payments(&self.db, document.id).await?;
        Ok(DocumentWithLines {
            document,
            lines,
            payments,
        })
    }

    async fn record_payment_inner(
        &self,
        document_id: DocumentId,
        input: &PaymentInput,
    ) -> Result<DocumentWithLines, DocumentError> {
        let txn = self.db.begin().await?;

        let document = require_document(&txn, document_id).await?;
        let kind: DocumentKind = document.kind.into();
        if !kind.is_sales() {
            return Err(DocumentError::PaymentNotSupported(kind));
        }
        if DocumentStatus::from(document.status) == DocumentStatus::Cancelled {
            return Err(DocumentError::PaymentOnCancelled(document.id));
        }
        if input.amount <= Decimal::ZERO {
            return Err(DocumentError::InvalidPaymentAmount(input.amount));
        }

        let payment = payments::ActiveModel {
            id: Set(PaymentId::new().into_inner()),
            document_id: Set(document.id),
            amount: Set(input.amount),
            paid_on: Set(input.paid_on),
            method: Set(input.method.into()),
            recorded_by: Set(input.recorded_by.into_inner()),
            created_at: Set(Utc::now()),
        };
        payment.insert(&txn).await?;

        let document = refresh_paid_amounts(&txn, document).await?;
        balance::recompute(&txn, CounterpartyId::from_uuid(document.counterparty_id)).await?;
        txn.commit().await?;

        tracing::info!(
            document_id = %document_id,
            code = %document.code,
            amount = %input.amount,
            "recorded payment"
        );

        self.assemble(&self.db, document).await
    }

    async fn remove_payment_inner(
        &self,
        document_id: DocumentId,
        payment_id: PaymentId,
    ) -> Result<DocumentWithLines, DocumentError> {
        let txn = self.db.begin().await?;

        let document = require_document(&txn, document_id).await?;
        if DocumentStatus::from(document.status) == DocumentStatus::Cancelled {
            return Err(DocumentError::PaymentOnCancelled(document.id));
        }
        let payment = payments::Entity::find_by_id(payment_id.into_inner())
            .one(&txn)
            .await?
            .filter(|payment| payment.document_id == document.id)
            .ok_or(DocumentError::PaymentNotFound(payment_id.into_inner()))?;

        payments::Entity::delete_by_id(payment.id).exec(&txn).await?;

        let document = refresh_paid_amounts(&txn, document).await?;
        balance::recompute(&txn, CounterpartyId::from_uuid(document.counterparty_id)).await?;
        txn.commit().await?;

        tracing::info!(
            document_id = %document_id,
            payment_id = %payment_id,
            "removed payment"
        );

        self.assemble(&self.db, document).await
    }

    async fn assemble(
        &self,
        conn: &DatabaseConnection,
        document: documents::Model,
    ) -> Result<DocumentWithLines, DocumentError> {
        let lines = load_lines_conn(conn, document.id).await?;
        let payments = load_payments(conn, document.id).await?;
        Ok(DocumentWithLines {
            document,
            lines,
            payments,
        })
    }
}

/// Resolves products, prices, and the non-listed policy for a line set,
/// returning insert-ready lines and any warnings.
#[allow(clippy::too_many_arguments)]
async fn prepare_lines(
    txn: &DatabaseTransaction,
    kind: DocumentKind,
    branch_id: BranchId,
    counterparty_id: CounterpartyId,
    user_id: UserId,
    document_date: NaiveDate,
    lines: &[LineInput],
) -> Result<(Vec<PreparedLine>, Vec<PricingWarning>), DocumentError> {
    let ranked = if kind.is_sales() {
        let ctx = pricing::load_context(
            txn,
            Some(branch_id),
            Some(counterparty_id),
            Some(user_id),
            document_date,
        )
        .await?;
        pricing::load_applicable_lists(txn, &ctx).await?
    } else {
        Vec::new()
    };
    let primary = ranked.first().cloned();

    let mut prepared = Vec::with_capacity(lines.len());
    let mut warnings = Vec::new();

    for line in lines {
        let product = catalog::require_product(txn, line.product_id).await?;

        let unit_price = if let Some(price) = line.unit_price {
            price
        } else if kind.is_sales() {
            let resolved = pricing::resolve_for_product(txn, &ranked, &product).await?;
            if let Some(primary) = &primary {
                match evaluate_non_listed_policy(
                    primary,
                    line.product_id,
                    &product.code,
                    &resolved,
                )? {
                    PolicyOutcome::Listed | PolicyOutcome::AllowedNonListed(None) => {}
                    PolicyOutcome::AllowedNonListed(Some(warning)) => warnings.push(warning),
                }
            }
            resolved.price
        } else {
            product.base_price
        };

        prepared.push(PreparedLine {
            product_id: product.id,
            product_code: product.code,
            product_name: product.name,
            quantity: line.quantity,
            unit_price,
            discount_amount: line.discount_amount,
            discount_ratio: line.discount_ratio,
            line_total: Decimal::ZERO,
        });
    }

    let amounts: Vec<LineAmounts> = prepared
        .iter()
        .map(|line| LineAmounts {
            quantity: line.quantity,
            unit_price: line.unit_price,
            discount_amount: line.discount_amount,
            discount_ratio: line.discount_ratio,
        })
        .collect();
    validate_lines(&amounts)?;

    for (line, amounts) in prepared.iter_mut().zip(&amounts) {
        line.line_total = line_total(amounts);
    }

    Ok((prepared, warnings))
}

async fn require_document(
    txn: &DatabaseTransaction,
    document_id: DocumentId,
) -> Result<documents::Model, DocumentError> {
    documents::Entity::find_by_id(document_id.into_inner())
        .one(txn)
        .await?
        .ok_or(DocumentError::NotFound(document_id.into_inner()))
}

async fn load_lines(
    txn: &DatabaseTransaction,
    document_id: Uuid,
) -> Result<Vec<line_items::Model>, DocumentError> {
    Ok(line_items::Entity::find()
        .filter(line_items::Column::DocumentId.eq(document_id))
        .order_by_asc(line_items::Column::Position)
        .all(txn)
        .await?)
}

async fn load_lines_conn(
    conn: &DatabaseConnection,
    document_id: Uuid,
) -> Result<Vec<line_items::Model>, DocumentError> {
    Ok(line_items::Entity::find()
        .filter(line_items::Column::DocumentId.eq(document_id))
        .order_by_asc(line_items::Column::Position)
        .all(conn)
        .await?)
}

async fn load_payments(
    conn: &DatabaseConnection,
    document_id: Uuid,
) -> Result<Vec<payments::Model>, DocumentError> {
    Ok(payments::Entity::find()
        .filter(payments::Column::DocumentId.eq(document_id))
        .order_by_asc(payments::Column::CreatedAt)
        .all(conn)
        .await?)
}

async fn sum_payments(
    txn: &DatabaseTransaction,
    document_id: Uuid,
) -> Result<Decimal, DocumentError> {
    let rows = payments::Entity::find()
        .filter(payments::Column::DocumentId.eq(document_id))
        .all(txn)
        .await?;
    Ok(rows.iter().map(|payment| payment.amount).sum())
}

/// Rewrites `paid_amount` and `debt_amount` from the payment rows.
async fn refresh_paid_amounts(
    txn: &DatabaseTransaction,
    document: documents::Model,
) -> Result<documents::Model, DocumentError> {
    let paid = sum_payments(txn, document.id).await?;
    let grand_total = document.grand_total;

    let mut active: documents::ActiveModel = document.into();
    active.paid_amount = Set(paid);
    active.debt_amount = Set(debt_amount(grand_total, paid));
    active.updated_at = Set(Utc::now());
    Ok(active.update(txn).await?)
}

async fn insert_lines(
    txn: &DatabaseTransaction,
    document_id: Uuid,
    prepared: &[PreparedLine],
) -> Result<Vec<line_items::Model>, DocumentError> {
    let mut inserted = Vec::with_capacity(prepared.len());
    for (position, line) in prepared.iter().enumerate() {
        let row = line_items::ActiveModel {
            id: Set(Uuid::now_v7()),
            document_id: Set(document_id),
            position: Set(i32::try_from(position).unwrap_or(i32::MAX)),
            product_id: Set(line.product_id),
            product_code: Set(line.product_code.clone()),
            product_name: Set(line.product_name.clone()),
            quantity: Set(line.quantity),
            unit_price: Set(line.unit_price),
            discount_amount: Set(line.discount_amount),
            discount_ratio: Set(line.discount_ratio),
            line_total: Set(line.line_total),
        };
        inserted.push(row.insert(txn).await?);
    }
    Ok(inserted)
}

/// Shapes stored lines back into the prepared form used by stock handling.
fn as_prepared(lines: &[line_items::Model]) -> Vec<PreparedLine> {
    lines
        .iter()
        .map(|line| PreparedLine {
            product_id: line.product_id,
            product_code: line.product_code.clone(),
            product_name: line.product_name.clone(),
            quantity: line.quantity,
            unit_price: line.unit_price,
            discount_amount: line.discount_amount,
            discount_ratio: line.discount_ratio,
            line_total: line.line_total,
        })
        .collect()
}

/// Applies (or, with `reverse`, undoes) the stock effect of a document in
/// `status` for the given lines.
async fn apply_stock(
    txn: &DatabaseTransaction,
    kind: DocumentKind,
    status: DocumentStatus,
    branch_id: BranchId,
    lines: &[PreparedLine],
    reverse: bool,
) -> Result<(), DocumentError> {
    let Some(direction) = stock_effect(kind, status) else {
        return Ok(());
    };

    for line in lines {
        let mut delta = match direction {
            StockDirection::Decrement => -line.quantity,
            StockDirection::Increment => line.quantity,
        };
        if reverse {
            delta = -delta;
        }
        inventory::adjust_on_hand(txn, ProductId::from_uuid(line.product_id), branch_id, delta)
            .await?;
    }
    Ok(())
}
