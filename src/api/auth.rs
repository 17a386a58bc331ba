//! Login, registration and the advisory role checks.
//!
//! The token issued at login is read back from `Authorization: Bearer <token>`.

use super::{AppState, error::ApiResult};
use crate::{
    core::auth::{self, AuthSession, NewAccount},
    entities::{AccountModel, Role},
    errors::Error,
};
use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header},
    routing::{get, post},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Body of the login endpoint
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    email: String,
    password: String,
}

/// Answer of the role and resource checks
#[derive(Debug, Serialize)]
pub struct AccessResponse {
    allowed: bool,
}

pub(super) fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/register", post(register))
        .route("/api/auth/logout", post(logout))
        .route("/api/auth/me", get(me))
        .route("/api/auth/access/{resource}", get(access))
        .route("/api/auth/role/{role}", get(role))
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
}

async fn login(State(state): State<AppState>, Json(payload): Json<LoginRequest>) -> ApiResult<Json<AuthSession>> {
    auth::login(&state.db, &payload.email, &payload.password, Utc::now())
        .await?
        .map(Json)
        .ok_or_else(|| Error::InvalidCredentials.into())
}

async fn register(
    State(state): State<AppState>,
    Json(payload): Json<NewAccount>,
) -> ApiResult<(StatusCode, Json<AuthSession>)> {
    let session = auth::register(&state.db, payload, Utc::now()).await?;
    Ok((StatusCode::CREATED, Json(session)))
}

async fn logout(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<StatusCode> {
    if let Some(token) = bearer_token(&headers) {
        auth::logout(&state.db, token).await?;
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn me(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<Json<AccountModel>> {
    let Some(token) = bearer_token(&headers) else {
        return Err(Error::InvalidCredentials.into());
    };
    auth::current_user(&state.db, token, Utc::now())
        .await?
        .map(Json)
        .ok_or_else(|| Error::InvalidCredentials.into())
}

async fn access(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(resource): Path<String>,
) -> ApiResult<Json<AccessResponse>> {
    let allowed = match bearer_token(&headers) {
        Some(token) => auth::can_access(&state.db, token, &resource, Utc::now()).await?,
        None => false,
    };
    Ok(Json(AccessResponse { allowed }))
}

async fn role(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(required): Path<Role>,
) -> ApiResult<Json<AccessResponse>> {
    let allowed = match bearer_token(&headers) {
        Some(token) => auth::has_role(&state.db, token, required, Utc::now()).await?,
        None => false,
    };
    Ok(Json(AccessResponse { allowed }))
}
