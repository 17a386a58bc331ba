//! Contact-form forwarding.
//!
//! A submission from the marketing site becomes two emails: a lead notification for the
//! sales inbox and a confirmation for the visitor. Delivery goes through the [`Mailer`]
//! trait; [`ResendMailer`] talks to the Resend HTTP API.

use crate::{
    config::settings::ContactConfig,
    errors::{Error, Result},
};
use askama::Template;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, warn};

/// Resend endpoint for sending a single email
pub const RESEND_ENDPOINT: &str = "https://api.resend.com/emails";
/// Environment variable holding the Resend API key
pub const RESEND_API_KEY_VAR: &str = "RESEND_API_KEY";

/// Body posted by the contact form.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactRequest {
    /// Visitor name
    pub name: String,
    /// Visitor email; receives the confirmation
    pub email: String,
    /// Visitor organization
    pub organization: String,
    /// Kind of organization (company, NGO, government...)
    pub organization_type: String,
    /// Optional free text
    #[serde(default)]
    pub message: Option<String>,
}

/// A message ready to hand to a [`Mailer`], serialized in the provider's shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutgoingEmail {
    /// `From` header
    pub from: String,
    /// Recipients
    pub to: Vec<String>,
    /// Subject line
    pub subject: String,
    /// HTML body
    pub html: String,
}

/// Anything that can deliver an [`OutgoingEmail`].
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Sends the email and returns the provider's response payload.
    async fn send(&self, email: &OutgoingEmail) -> Result<serde_json::Value>;
}

/// [`Mailer`] backed by the Resend HTTP API.
#[derive(Debug, Clone)]
pub struct ResendMailer {
    client: reqwest::Client,
    api_key: Option<String>,
    endpoint: String,
}

impl ResendMailer {
    /// Creates a mailer; without a key every send fails.
    #[must_use]
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            endpoint: RESEND_ENDPOINT.to_string(),
        }
    }

    /// Creates a mailer using `RESEND_API_KEY`, warning when it is missing.
    #[must_use]
    pub fn from_env() -> Self {
        let api_key = std::env::var(RESEND_API_KEY_VAR).ok();
        if api_key.is_none() {
            warn!("{} not set; contact form emails will fail", RESEND_API_KEY_VAR);
        }
        Self::new(api_key)
    }
}

#[async_trait]
impl Mailer for ResendMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<serde_json::Value> {
        let api_key = self.api_key.as_deref().ok_or_else(|| Error::Email {
            message: format!("{RESEND_API_KEY_VAR} is not set"),
        })?;

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(email)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Email {
                message: format!("{status}: {body}"),
            });
        }
        Ok(response.json().await?)
    }
}

/// Lead notification body. Fields are HTML-escaped on render.
#[derive(Template)]
#[template(path = "email/lead.html")]
struct LeadTemplate<'a> {
    name: &'a str,
    email: &'a str,
    organization: &'a str,
    organization_type: &'a str,
    message: &'a str,
    submitted_at: String,
}

/// Visitor confirmation body.
#[derive(Template)]
#[template(path = "email/confirmation.html")]
struct ConfirmationTemplate<'a> {
    name: &'a str,
    phone: &'a str,
}

/// Lead notification for the sales inbox.
pub fn lead_email(
    config: &ContactConfig,
    request: &ContactRequest,
    submitted_at: DateTime<Utc>,
) -> Result<OutgoingEmail> {
    let message = request
        .message
        .as_deref()
        .filter(|m| !m.trim().is_empty())
        .unwrap_or("No message provided");

    let html = LeadTemplate {
        name: &request.name,
        email: &request.email,
        organization: &request.organization,
        organization_type: &request.organization_type,
        message,
        submitted_at: submitted_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
    }
    .render()?;

    Ok(OutgoingEmail {
        from: config.lead_sender.clone(),
        to: config.recipients.clone(),
        subject: format!("New Lead: {} from {}", request.name, request.organization),
        html,
    })
}

/// Confirmation sent back to the visitor.
pub fn confirmation_email(config: &ContactConfig, request: &ContactRequest) -> Result<OutgoingEmail> {
    let html = ConfirmationTemplate {
        name: &request.name,
        phone: &config.phone,
    }
    .render()?;

    Ok(OutgoingEmail {
        from: config.confirmation_sender.clone(),
        to: vec![request.email.clone()],
        subject: "Thank you for contacting DSX - We'll be in touch soon!".to_string(),
        html,
    })
}

/// Sends the lead notification, then the confirmation.
///
/// A failed lead notification fails the submission. A failed confirmation is only logged,
/// since the lead has already been delivered. Returns the provider payload of the lead send.
#[instrument(skip_all, fields(organization = %request.organization))]
pub async fn submit_contact(
    mailer: &dyn Mailer,
    config: &ContactConfig,
    request: &ContactRequest,
    now: DateTime<Utc>,
) -> Result<serde_json::Value> {
    let data = mailer
        .send(&lead_email(config, request, now)?)
        .await
        .inspect_err(|e| error!("Lead email failed: {}", e))?;

    let confirmation = confirmation_email(config, request)?;
    if let Err(e) = mailer.send(&confirmation).await {
        warn!("Confirmation email to visitor failed: {}", e);
    }

    info!("Contact submission forwarded");
    Ok(data)
}
