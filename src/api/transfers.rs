use super::{AppState, error::ApiResult};
use crate::{
    core::transfer::{self, NewTransfer, TransferSummary},
    entities::{BudgetTransferModel, TransferStatus},
    errors::Error,
};
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
};
use serde::Deserialize;

/// `?q=&status=` on the transfer list
#[derive(Debug, Default, Deserialize)]
pub struct TransferQuery {
    q: Option<String>,
    status: Option<TransferStatus>,
}

/// Body of the approve endpoint
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApproveRequest {
    approved_by: String,
    #[serde(default)]
    comments: Option<String>,
}

/// Body of the reject endpoint
#[derive(Debug, Default, Deserialize)]
pub struct RejectRequest {
    #[serde(default)]
    comments: Option<String>,
}

pub(super) fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/transfers", get(list_transfers).post(create_transfer))
        .route("/api/transfers/summary", get(summary))
        .route("/api/transfers/{id}", get(get_transfer))
        .route("/api/transfers/{id}/approve", post(approve))
        .route("/api/transfers/{id}/reject", post(reject))
}

async fn list_transfers(
    State(state): State<AppState>,
    Query(query): Query<TransferQuery>,
) -> ApiResult<Json<Vec<BudgetTransferModel>>> {
    let transfers = transfer::search_transfers(&state.db, query.q.as_deref(), query.status).await?;
    Ok(Json(transfers))
}

async fn create_transfer(
    State(state): State<AppState>,
    Json(payload): Json<NewTransfer>,
) -> ApiResult<(StatusCode, Json<BudgetTransferModel>)> {
    let created = transfer::create_transfer(&state.db, payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn summary(State(state): State<AppState>) -> ApiResult<Json<TransferSummary>> {
    Ok(Json(transfer::transfer_summary(&state.db).await?))
}

async fn get_transfer(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<BudgetTransferModel>> {
    transfer::get_transfer_by_id(&state.db, &id)
        .await?
        .map(Json)
        .ok_or_else(|| Error::TransferNotFound { id }.into())
}

async fn approve(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<ApproveRequest>,
) -> ApiResult<Json<BudgetTransferModel>> {
    let approved = transfer::approve_transfer(&state.db, &id, &payload.approved_by, payload.comments).await?;
    Ok(Json(approved))
}

async fn reject(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<RejectRequest>,
) -> ApiResult<Json<BudgetTransferModel>> {
    Ok(Json(transfer::reject_transfer(&state.db, &id, payload.comments).await?))
}
