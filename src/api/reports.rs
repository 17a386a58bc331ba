use super::{AppState, error::ApiResult};
use crate::{
    core::reports::{self, AuditData, ExecutionData, ReportExportFormat, ReportFilters, TransferData},
    entities::{ReportModel, ReportType},
    errors::Error,
};
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// `?q=` on the report list
#[derive(Debug, Default, Deserialize)]
pub struct ReportQuery {
    q: Option<String>,
}

/// Body of the generate endpoint
#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    #[serde(rename = "type")]
    report_type: ReportType,
    #[serde(default)]
    filters: ReportFilters,
}

/// Body of the export endpoint
#[derive(Debug, Deserialize)]
pub struct ExportRequest {
    format: ReportExportFormat,
}

#[derive(Debug, Serialize)]
struct MonthCount {
    count: usize,
}

#[derive(Debug, Serialize)]
struct ExportResponse {
    message: String,
}

pub(super) fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/reports", get(list_reports).post(generate))
        .route("/api/reports/this-month", get(this_month))
        .route("/api/reports/charts/execution", get(execution))
        .route("/api/reports/charts/transfers", get(transfers))
        .route("/api/reports/charts/audit", get(audit))
        .route("/api/reports/{id}", delete(delete_report))
        .route("/api/reports/{id}/export", post(export))
}

async fn list_reports(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> ApiResult<Json<Vec<ReportModel>>> {
    let reports = match query.q.as_deref() {
        Some(term) => reports::search_reports(&state.db, term).await?,
        None => reports::get_reports(&state.db).await?,
    };
    Ok(Json(reports))
}

async fn generate(
    State(state): State<AppState>,
    Json(payload): Json<GenerateRequest>,
) -> ApiResult<(StatusCode, Json<ReportModel>)> {
    let report = reports::generate_report(&state.db, payload.report_type, payload.filters).await?;
    Ok((StatusCode::CREATED, Json(report)))
}

async fn this_month(State(state): State<AppState>) -> ApiResult<Json<MonthCount>> {
    let count = reports::reports_this_month(&state.db, Utc::now()).await?;
    Ok(Json(MonthCount { count }))
}

async fn delete_report(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<StatusCode> {
    if reports::delete_report(&state.db, &id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(Error::ReportNotFound { id }.into())
    }
}

async fn export(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<ExportRequest>,
) -> ApiResult<Json<ExportResponse>> {
    let message = reports::export_report(&state.db, &id, payload.format).await?;
    Ok(Json(ExportResponse { message }))
}

async fn execution() -> Json<Vec<ExecutionData>> {
    Json(reports::execution_data())
}

async fn transfers() -> Json<Vec<TransferData>> {
    Json(reports::transfer_data())
}

async fn audit() -> Json<Vec<AuditData>> {
    Json(reports::audit_data())
}
