//! Document routes: orders, invoices, and purchase orders.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;

use vendra_core::document::{DocumentKind, DocumentStatus, PaymentMethod, PaymentStatus, payment_status};
use vendra_core::pricing::PricingWarning;
use vendra_db::DocumentRepository;
use vendra_db::entities::{documents, line_items, payments};
use vendra_db::repositories::{
    CreateDocumentInput, DocumentWithLines, LineInput, PaymentInput, UpdateDocumentInput,
};
use vendra_shared::types::{
    BranchId, CounterpartyId, DocumentId, PageRequest, PaymentId, ProductId, UserId,
};

use crate::{AppState, error::ApiError};

/// Creates the document routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/documents", post(create_document).get(list_documents))
        .route(
            "/documents/{document_id}",
            get(get_document)
                .put(update_document)
                .delete(delete_document),
        )
        .route("/documents/{document_id}/status", put(transition_document))
        .route("/documents/{document_id}/payments", post(record_payment))
        .route(
            "/documents/{document_id}/payments/{payment_id}",
            axum::routing::delete(remove_payment),
        )
}

/// One requested document line.
#[derive(Debug, Deserialize)]
pub struct LineRequest {
    /// The product to sell or buy.
    pub product_id: ProductId,
    /// Quantity, strictly positive.
    pub quantity: Decimal,
    /// Explicit unit price; omit to resolve through the price lists.
    pub unit_price: Option<Decimal>,
    /// Flat line discount.
    #[serde(default)]
    pub discount_amount: Decimal,
    /// Percentage line discount.
    #[serde(default)]
    pub discount_ratio: Decimal,
}

impl From<LineRequest> for LineInput {
    fn from(req: LineRequest) -> Self {
        Self {
            product_id: req.product_id,
            quantity: req.quantity,
            unit_price: req.unit_price,
            discount_amount: req.discount_amount,
            discount_ratio: req.discount_ratio,
        }
    }
}

/// Request body for creating a document.
#[derive(Debug, Deserialize)]
pub struct CreateDocumentRequest {
    /// Document kind.
    pub kind: DocumentKind,
    /// Customer or supplier.
    pub counterparty_id: CounterpartyId,
    /// Branch the document belongs to.
    pub branch_id: BranchId,
    /// Acting user.
    pub created_by: UserId,
    /// Document date.
    pub document_date: NaiveDate,
    /// Flat document discount.
    #[serde(default)]
    pub discount_amount: Decimal,
    /// Percentage document discount.
    #[serde(default)]
    pub discount_ratio: Decimal,
    /// The lines, at least one.
    pub lines: Vec<LineRequest>,
}

/// Request body for a full-replace update.
#[derive(Debug, Deserialize)]
pub struct UpdateDocumentRequest {
    /// New document date.
    pub document_date: NaiveDate,
    /// New flat document discount.
    #[serde(default)]
    pub discount_amount: Decimal,
    /// New percentage document discount.
    #[serde(default)]
    pub discount_ratio: Decimal,
    /// The full replacement line set.
    pub lines: Vec<LineRequest>,
}

/// Request body for a status change.
#[derive(Debug, Deserialize)]
pub struct TransitionRequest {
    /// The target status.
    pub status: DocumentStatus,
}

/// Request body for recording a payment.
#[derive(Debug, Deserialize)]
pub struct PaymentRequest {
    /// Amount paid, strictly positive.
    pub amount: Decimal,
    /// Date of payment.
    pub paid_on: NaiveDate,
    /// How it was paid.
    pub method: PaymentMethod,
    /// Acting user.
    pub recorded_by: UserId,
}

/// Query parameters for the document list.
#[derive(Debug, Deserialize)]
pub struct ListDocumentsQuery {
    /// Restrict to one document kind.
    pub kind: Option<DocumentKind>,
    /// Page number (1-indexed).
    pub page: Option<u32>,
    /// Number of items per page.
    pub per_page: Option<u32>,
}

impl ListDocumentsQuery {
    fn page_request(&self) -> PageRequest {
        let defaults = PageRequest::default();
        PageRequest {
            page: self.page.unwrap_or(defaults.page),
            per_page: self.per_page.unwrap_or(defaults.per_page),
        }
    }
}

/// A document with its lines, payments, and derived payment status.
#[derive(Debug, Serialize)]
pub struct DocumentResponse {
    /// The document header.
    #[serde(flatten)]
    pub document: documents::Model,
    /// Derived payment status; recomputed on every read, never stored.
    pub payment_status: PaymentStatus,
    /// Lines in position order.
    pub lines: Vec<line_items::Model>,
    /// Payments in recording order.
    pub payments: Vec<payments::Model>,
}

impl From<DocumentWithLines> for DocumentResponse {
    fn from(doc: DocumentWithLines) -> Self {
        let payment_status = payment_status(doc.document.grand_total, doc.document.paid_amount);
        Self {
            document: doc.document,
            payment_status,
            lines: doc.lines,
            payments: doc.payments,
        }
    }
}

/// Creation response: the document plus non-fatal pricing warnings.
#[derive(Debug, Serialize)]
pub struct CreateDocumentResponse {
    /// The created document.
    #[serde(flatten)]
    pub document: DocumentResponse,
    /// Non-listed-product warnings.
    pub warnings: Vec<PricingWarning>,
}

/// POST /documents - Create a document.
async fn create_document(
    State(state): State<AppState>,
    Json(payload): Json<CreateDocumentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = DocumentRepository::new((*state.db).clone()).with_retries(state.conflict_retries);

    let result = repo
        .create(CreateDocumentInput {
            kind: payload.kind,
            counterparty_id: payload.counterparty_id,
            branch_id: payload.branch_id,
            created_by: payload.created_by,
            document_date: payload.document_date,
            discount_amount: payload.discount_amount,
            discount_ratio: payload.discount_ratio,
            lines: payload.lines.into_iter().map(Into::into).collect(),
        })
        .await?;

    info!(code = %result.document.document.code, "document created via API");

    Ok((
        StatusCode::CREATED,
        Json(CreateDocumentResponse {
            document: result.document.into(),
            warnings: result.warnings,
        }),
    ))
}

/// GET /documents - List documents, optionally filtered by kind.
async fn list_documents(
    State(state): State<AppState>,
    Query(query): Query<ListDocumentsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = DocumentRepository::new((*state.db).clone()).with_retries(state.conflict_retries);
    let page = repo.list(query.kind, query.page_request()).await?;
    Ok(Json(page))
}

/// GET `/documents/{document_id}` - Fetch one document.
async fn get_document(
    State(state): State<AppState>,
    Path(document_id): Path<DocumentId>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = DocumentRepository::new((*state.db).clone()).with_retries(state.conflict_retries);
    let doc = repo.get(document_id).await?;
    Ok(Json(DocumentResponse::from(doc)))
}

/// PUT `/documents/{document_id}` - Replace date, discounts, and lines.
async fn update_document(
    State(state): State<AppState>,
    Path(document_id): Path<DocumentId>,
    Json(payload): Json<UpdateDocumentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = DocumentRepository::new((*state.db).clone()).with_retries(state.conflict_retries);

    let doc = repo
        .update(
            document_id,
            UpdateDocumentInput {
                document_date: payload.document_date,
                discount_amount: payload.discount_amount,
                discount_ratio: payload.discount_ratio,
                lines: payload.lines.into_iter().map(Into::into).collect(),
            },
        )
        .await?;

    Ok(Json(DocumentResponse::from(doc)))
}

/// DELETE `/documents/{document_id}` - Delete a document.
async fn delete_document(
    State(state): State<AppState>,
    Path(document_id): Path<DocumentId>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = DocumentRepository::new((*state.db).clone()).with_retries(state.conflict_retries);
    repo.remove(document_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT `/documents/{document_id}/status` - Change the document status.
async fn transition_document(
    State(state): State<AppState>,
    Path(document_id): Path<DocumentId>,
    Json(payload): Json<TransitionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = DocumentRepository::new((*state.db).clone()).with_retries(state.conflict_retries);
    let doc = repo.transition(document_id, payload.status).await?;
    Ok(Json(DocumentResponse::from(doc)))
}

/// POST `/documents/{document_id}/payments` - Record a payment.
async fn record_payment(
    State(state): State<AppState>,
    Path(document_id): Path<DocumentId>,
    Json(payload): Json<PaymentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = DocumentRepository::new((*state.db).clone()).with_retries(state.conflict_retries);

    let doc = repo
        .record_payment(
            document_id,
            PaymentInput {
                amount: payload.amount,
                paid_on: payload.paid_on,
                method: payload.method,
                recorded_by: payload.recorded_by,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(DocumentResponse::from(doc))))
}

/// DELETE `/documents/{document_id}/payments/{payment_id}` - Remove a payment.
async fn remove_payment(
    State(state): State<AppState>,
    Path((document_id, payment_id)): Path<(DocumentId, PaymentId)>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = DocumentRepository::new((*state.db).clone()).with_retries(state.conflict_retries);
    let doc = repo.remove_payment(document_id, payment_id).await?;
    Ok(Json(DocumentResponse::from(doc)))
}
