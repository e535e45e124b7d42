//! Inter-branch transfer routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;

use vendra_core::transfer::TransferStatus;
use vendra_db::TransferRepository;
use vendra_db::entities::{transfer_details, transfers};
use vendra_db::repositories::{
    CreateTransferInput, TransferLineInput, TransferWithDetails, UpdateTransferInput,
};
use vendra_shared::types::{BranchId, ProductId, TransferId, UserId};

use crate::{AppState, error::ApiError};

/// Creates the transfer routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/transfers", post(create_transfer))
        .route(
            "/transfers/{transfer_id}",
            get(get_transfer).put(update_transfer).delete(delete_transfer),
        )
        .route("/transfers/{transfer_id}/status", put(transition_transfer))
}

/// One requested transfer line.
#[derive(Debug, Deserialize)]
pub struct TransferLineRequest {
    /// The product to move.
    pub product_id: ProductId,
    /// Quantity leaving the source, strictly positive.
    pub quantity_sent: Decimal,
    /// Quantity arriving at the destination; defaults to the sent quantity.
    pub quantity_received: Option<Decimal>,
    /// Unit value for the transfer total; defaults to the catalog base price.
    pub send_price: Option<Decimal>,
    /// Booking price at the destination; defaults to the send price.
    pub receive_price: Option<Decimal>,
}

impl From<TransferLineRequest> for TransferLineInput {
    fn from(req: TransferLineRequest) -> Self {
        Self {
            product_id: req.product_id,
            quantity_sent: req.quantity_sent,
            quantity_received: req.quantity_received,
            send_price: req.send_price,
            receive_price: req.receive_price,
        }
    }
}

/// Request body for creating a transfer.
#[derive(Debug, Deserialize)]
pub struct CreateTransferRequest {
    /// Branch goods leave from.
    pub source_branch_id: BranchId,
    /// Branch goods arrive at.
    pub dest_branch_id: BranchId,
    /// Acting user.
    pub created_by: UserId,
    /// Transfer date.
    pub transfer_date: NaiveDate,
    /// Commit (and move stock) immediately instead of saving a draft.
    #[serde(default)]
    pub commit: bool,
    /// The lines, at least one.
    pub lines: Vec<TransferLineRequest>,
}

/// Request body for a full-replace update.
#[derive(Debug, Deserialize)]
pub struct UpdateTransferRequest {
    /// New transfer date.
    pub transfer_date: NaiveDate,
    /// The full replacement line set.
    pub lines: Vec<TransferLineRequest>,
}

/// Request body for a status change.
#[derive(Debug, Deserialize)]
pub struct TransferTransitionRequest {
    /// The target status.
    pub status: TransferStatus,
}

/// A transfer with its detail lines.
#[derive(Debug, Serialize)]
pub struct TransferResponse {
    /// The transfer header.
    #[serde(flatten)]
    pub transfer: transfers::Model,
    /// Detail lines.
    pub details: Vec<transfer_details::Model>,
}

impl From<TransferWithDetails> for TransferResponse {
    fn from(transfer: TransferWithDetails) -> Self {
        Self {
            transfer: transfer.transfer,
            details: transfer.details,
        }
    }
}

/// POST /transfers - Create a transfer (draft or committed).
async fn create_transfer(
    State(state): State<AppState>,
    Json(payload): Json<CreateTransferRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = TransferRepository::new((*state.db).clone()).with_retries(state.conflict_retries);

    let transfer = repo
        .create(CreateTransferInput {
            source_branch_id: payload.source_branch_id,
            dest_branch_id: payload.dest_branch_id,
            created_by: payload.created_by,
            transfer_date: payload.transfer_date,
            commit: payload.commit,
            lines: payload.lines.into_iter().map(Into::into).collect(),
        })
        .await?;

    info!(code = %transfer.transfer.code, "transfer created via API");

    Ok((StatusCode::CREATED, Json(TransferResponse::from(transfer))))
}

/// GET `/transfers/{transfer_id}` - Fetch one transfer.
async fn get_transfer(
    State(state): State<AppState>,
    Path(transfer_id): Path<TransferId>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = TransferRepository::new((*state.db).clone()).with_retries(state.conflict_retries);
    let transfer = repo.get(transfer_id).await?;
    Ok(Json(TransferResponse::from(transfer)))
}

/// PUT `/transfers/{transfer_id}` - Replace date and lines.
async fn update_transfer(
    State(state): State<AppState>,
    Path(transfer_id): Path<TransferId>,
    Json(payload): Json<UpdateTransferRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = TransferRepository::new((*state.db).clone()).with_retries(state.conflict_retries);

    let transfer = repo
        .update(
            transfer_id,
            UpdateTransferInput {
                transfer_date: payload.transfer_date,
                lines: payload.lines.into_iter().map(Into::into).collect(),
            },
        )
        .await?;

    Ok(Json(TransferResponse::from(transfer)))
}

/// DELETE `/transfers/{transfer_id}` - Delete a transfer.
async fn delete_transfer(
    State(state): State<AppState>,
    Path(transfer_id): Path<TransferId>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = TransferRepository::new((*state.db).clone()).with_retries(state.conflict_retries);
    repo.remove(transfer_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT `/transfers/{transfer_id}/status` - Change the transfer status.
async fn transition_transfer(
    State(state): State<AppState>,
    Path(transfer_id): Path<TransferId>,
    Json(payload): Json<TransferTransitionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = TransferRepository::new((*state.db).clone()).with_retries(state.conflict_retries);
    let transfer = repo.transition(transfer_id, payload.status).await?;
    Ok(Json(TransferResponse::from(transfer)))
}
