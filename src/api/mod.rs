//! HTTP surface - axum router over the core services.
//!
//! Handlers are thin: they extract parameters, call into [`crate::core`] and map
//! [`crate::errors::Error`] through [`error::ApiError`]. Role checks are exposed under
//! `/api/auth` but do not gate the data endpoints.

/// Administrative endpoints
pub mod admin;
/// Login, registration and role checks
pub mod auth;
/// Budgets and their items
pub mod budgets;
/// Contact-form email
pub mod contact;
/// Error to response mapping
pub mod error;
/// Saved reports and chart series
pub mod reports;
/// Budget transfers
pub mod transfers;

use crate::{
    config::settings::AppConfig,
    core::contact::Mailer,
    errors::{Error, Result},
};
use axum::{Router, routing::get};
use sea_orm::DatabaseConnection;
use std::{net::SocketAddr, sync::Arc};
use tracing::info;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    /// In-memory store
    pub db: DatabaseConnection,
    /// Outgoing email transport
    pub mailer: Arc<dyn Mailer>,
    /// Loaded `config.toml`
    pub config: Arc<AppConfig>,
}

/// Builds the full application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .merge(auth::routes())
        .merge(budgets::routes())
        .merge(transfers::routes())
        .merge(admin::routes())
        .merge(reports::routes())
        .merge(contact::routes())
        .with_state(state)
}

/// Binds the configured address and serves until the process stops.
pub async fn serve(state: AppState) -> Result<()> {
    let addr: SocketAddr = state
        .config
        .server
        .bind_address
        .parse()
        .map_err(|e| Error::Config {
            message: format!("Invalid bind address '{}': {e}", state.config.server.bind_address),
        })?;

    info!("dashboard listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router(state)).await?;
    Ok(())
}

async fn healthz() -> &'static str {
    "ok"
}

#[cfg(test)]
pub(crate) mod testing {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::{RecordingMailer, setup_seeded_db};
    use axum::{
        body::Body,
        http::{Method, Request, StatusCode, header},
    };
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    /// Router over a freshly seeded store with a recording mailer.
    pub async fn seeded_app() -> Router {
        seeded_app_with(Arc::new(RecordingMailer::default())).await
    }

    pub async fn seeded_app_with(mailer: Arc<dyn Mailer>) -> Router {
        let state = AppState {
            db: setup_seeded_db().await.unwrap(),
            mailer,
            config: Arc::new(AppConfig::default()),
        };
        router(state)
    }

    /// Sends one request and returns the status and parsed JSON body (`Null` when empty).
    pub async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        body: Option<serde_json::Value>,
        token: Option<&str>,
    ) -> (StatusCode, serde_json::Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| serde_json::Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        (status, json)
    }

    #[tokio::test]
    async fn test_healthz() {
        let app = seeded_app().await;
        let (status, body) = send(&app, Method::GET, "/healthz", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::Value::String("ok".to_string()));
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let app = seeded_app().await;
        let (status, _) = send(&app, Method::GET, "/api/nothing", None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
