use super::{AppState, error::ApiResult};
use crate::{
    core::admin::{
        self, AuditExportFormat, NewSystemUser, SystemConfig, SystemConfigUpdate, SystemStats, SystemUserUpdate,
    },
    entities::{AuditLogModel, SystemUserModel},
    errors::Error,
};
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};

/// `?q=` on the user list
#[derive(Debug, Default, Deserialize)]
pub struct UserQuery {
    q: Option<String>,
}

/// `?limit=` on the audit trail
#[derive(Debug, Default, Deserialize)]
pub struct AuditQuery {
    limit: Option<u64>,
}

/// Body of the audit export endpoint
#[derive(Debug, Deserialize)]
pub struct ExportRequest {
    format: AuditExportFormat,
}

/// Confirmation text returned by simulated operations
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    message: String,
}

pub(super) fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/admin/users", get(list_users).post(create_user))
        .route(
            "/api/admin/users/{id}",
            get(get_user).put(update_user).delete(delete_user),
        )
        .route("/api/admin/users/{id}/toggle-status", post(toggle_status))
        .route("/api/admin/config", get(get_config).put(update_config))
        .route("/api/admin/audit-logs", get(audit_logs))
        .route("/api/admin/audit-logs/export", post(export_audit_logs))
        .route("/api/admin/stats", get(stats))
        .route("/api/admin/backup", post(backup))
}

async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> ApiResult<Json<Vec<SystemUserModel>>> {
    let users = match query.q.as_deref() {
        Some(term) => admin::search_users(&state.db, term).await?,
        None => admin::get_users(&state.db).await?,
    };
    Ok(Json(users))
}

async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<NewSystemUser>,
) -> ApiResult<(StatusCode, Json<SystemUserModel>)> {
    let user = admin::create_user(&state.db, payload).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

async fn get_user(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<SystemUserModel>> {
    admin::get_user(&state.db, &id)
        .await?
        .map(Json)
        .ok_or_else(|| Error::UserNotFound { id }.into())
}

async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<SystemUserUpdate>,
) -> ApiResult<Json<SystemUserModel>> {
    admin::update_user(&state.db, &id, payload)
        .await?
        .map(Json)
        .ok_or_else(|| Error::UserNotFound { id }.into())
}

async fn delete_user(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<StatusCode> {
    if admin::delete_user(&state.db, &id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(Error::UserNotFound { id }.into())
    }
}

async fn toggle_status(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<SystemUserModel>> {
    admin::toggle_user_status(&state.db, &id)
        .await?
        .map(Json)
        .ok_or_else(|| Error::UserNotFound { id }.into())
}

async fn get_config(State(state): State<AppState>) -> ApiResult<Json<SystemConfig>> {
    Ok(Json(admin::get_system_config(&state.db).await?))
}

async fn update_config(
    State(state): State<AppState>,
    Json(payload): Json<SystemConfigUpdate>,
) -> ApiResult<Json<SystemConfig>> {
    Ok(Json(admin::update_system_config(&state.db, payload).await?))
}

async fn audit_logs(
    State(state): State<AppState>,
    Query(query): Query<AuditQuery>,
) -> ApiResult<Json<Vec<AuditLogModel>>> {
    Ok(Json(admin::get_audit_logs(&state.db, query.limit).await?))
}

async fn export_audit_logs(Json(payload): Json<ExportRequest>) -> Json<MessageResponse> {
    Json(MessageResponse {
        message: admin::export_audit_logs(payload.format),
    })
}

async fn stats(State(state): State<AppState>) -> ApiResult<Json<SystemStats>> {
    Ok(Json(admin::get_system_stats(&state.db).await?))
}

async fn backup(State(state): State<AppState>) -> ApiResult<Json<MessageResponse>> {
    let message = admin::perform_backup(&state.db).await?;
    Ok(Json(MessageResponse { message }))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use crate::api::testing::{seeded_app, send};
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    #[tokio::test]
    async fn test_user_crud_is_audited() {
        let app = seeded_app().await;

        let (status, user) = send(
            &app,
            Method::POST,
            "/api/admin/users",
            Some(json!({
                "name": "Pedro Pérez",
                "email": "pedro@empresa.com",
                "role": "invitado"
            })),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(user["status"], "active");
        let uri = format!("/api/admin/users/{}", user["id"].as_str().unwrap());

        let (_, toggled) = send(&app, Method::POST, &format!("{uri}/toggle-status"), None, None).await;
        assert_eq!(toggled["status"], "inactive");

        let (status, _) = send(&app, Method::DELETE, &uri, None, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = send(&app, Method::GET, &uri, None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (_, logs) = send(&app, Method::GET, "/api/admin/audit-logs?limit=2", None, None).await;
        let logs = logs.as_array().unwrap();
        assert_eq!(logs.len(), 2);
        assert_eq!(logs[0]["action"], "DELETE_USER");
        assert_eq!(logs[0]["severity"], "high");
    }

    #[tokio::test]
    async fn test_config_update_and_stats() {
        let app = seeded_app().await;

        let (status, config) = send(
            &app,
            Method::PUT,
            "/api/admin/config",
            Some(json!({ "companyName": "Nueva Empresa" })),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(config["companyName"], "Nueva Empresa");

        let (_, config) = send(&app, Method::GET, "/api/admin/config", None, None).await;
        assert_eq!(config["companyName"], "Nueva Empresa");

        let (_, stats) = send(&app, Method::GET, "/api/admin/stats", None, None).await;
        assert_eq!(stats["totalUsers"], 4);
        assert_eq!(stats["totalBudgets"], 2);
    }

    #[tokio::test]
    async fn test_simulated_operations() {
        let app = seeded_app().await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/admin/audit-logs/export",
            Some(json!({ "format": "csv" })),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["message"].as_str().unwrap().ends_with("CSV"));

        let (status, _) = send(&app, Method::POST, "/api/admin/backup", None, None).await;
        assert_eq!(status, StatusCode::OK);
        let (_, logs) = send(&app, Method::GET, "/api/admin/audit-logs?limit=1", None, None).await;
        assert_eq!(logs[0]["action"], "SYSTEM_BACKUP");
    }
}
