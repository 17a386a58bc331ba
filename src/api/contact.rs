use super::AppState;
use crate::{
    core::contact::{self, ContactRequest},
    errors::Error,
};
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};
use chrono::Utc;
use serde_json::json;
use tracing::error;

pub(super) fn routes() -> Router<AppState> {
    Router::new().route("/api/send-email", post(send_email))
}

/// Forwards a contact-form submission.
///
/// Always answers 500 on failure: `"Failed to send email"` when the provider refused the
/// lead email, `"Internal server error"` for anything else.
async fn send_email(State(state): State<AppState>, Json(request): Json<ContactRequest>) -> Response {
    match contact::submit_contact(state.mailer.as_ref(), &state.config.contact, &request, Utc::now()).await {
        Ok(data) => Json(json!({ "success": true, "data": data })).into_response(),
        Err(Error::Email { message }) => {
            error!("Email provider error: {}", message);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to send email" })),
            )
                .into_response()
        }
        Err(e) => {
            error!("Contact submission failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Internal server error" })),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use crate::api::testing::{seeded_app_with, send};
    use crate::core::contact::Mailer;
    use crate::test_utils::RecordingMailer;
    use axum::http::{Method, StatusCode};
    use serde_json::json;
    use std::sync::Arc;

    fn form() -> serde_json::Value {
        json!({
            "name": "Laura Méndez",
            "email": "laura@aurora.org",
            "organization": "Fundación Aurora",
            "organizationType": "ngo"
        })
    }

    #[tokio::test]
    async fn test_send_email_success() {
        let mailer = Arc::new(RecordingMailer::default());
        let app = seeded_app_with(Arc::clone(&mailer) as Arc<dyn Mailer>).await;

        let (status, body) = send(&app, Method::POST, "/api/send-email", Some(form()), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["id"], "email-1");
        assert_eq!(mailer.sent().len(), 2);
    }

    #[tokio::test]
    async fn test_send_email_provider_failure() {
        let app = seeded_app_with(Arc::new(RecordingMailer::failing())).await;

        let (status, body) = send(&app, Method::POST, "/api/send-email", Some(form()), None).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Failed to send email");
    }
}
