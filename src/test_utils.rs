//! Shared test utilities for the DSX dashboard.
//!
//! This module provides helpers for setting up test databases, building request
//! payloads with sensible defaults, and capturing outgoing email.

use crate::{
    config::database,
    core::{
        budget::NewBudgetItem,
        contact::{ContactRequest, Mailer, OutgoingEmail},
        seed,
        transfer::NewTransfer,
    },
    errors::{Error, Result},
};
use async_trait::async_trait;
use sea_orm::DatabaseConnection;
use std::sync::Mutex;

/// Creates an in-memory `SQLite` database with all tables initialized.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let options = database::connect_options(database::DEFAULT_DATABASE_URL);
    let db = sea_orm::Database::connect(options).await?;
    database::create_tables(&db).await?;
    Ok(db)
}

/// Creates an in-memory database holding the demo data set.
/// This is the standard setup for most service tests.
pub async fn setup_seeded_db() -> Result<DatabaseConnection> {
    let db = setup_test_db().await?;
    seed::seed_demo_data(&db).await?;
    Ok(db)
}

/// Builds a line item with the given code and amounts.
///
/// # Defaults
/// * `name`: `"Partida {code}"`
/// * `category`: `"Operaciones"`
/// * `department`: `"Administración"`
/// * `created_by`: None
#[must_use]
pub fn new_item(code: &str, budget_amount: f64, spent_amount: f64) -> NewBudgetItem {
    NewBudgetItem {
        code: code.to_string(),
        name: format!("Partida {code}"),
        category: "Operaciones".to_string(),
        department: "Administración".to_string(),
        budget_amount,
        spent_amount,
        created_by: None,
    }
}

/// Builds a transfer request between two items.
#[must_use]
pub fn new_transfer(from_item_id: &str, to_item_id: &str, amount: f64) -> NewTransfer {
    NewTransfer {
        from_item_id: from_item_id.to_string(),
        to_item_id: to_item_id.to_string(),
        amount,
        reason: "Reasignación de prueba".to_string(),
        requested_by: "María Financiera".to_string(),
    }
}

/// A complete contact-form submission.
#[must_use]
pub fn sample_contact() -> ContactRequest {
    ContactRequest {
        name: "Laura Méndez".to_string(),
        email: "laura@aurora.org".to_string(),
        organization: "Fundación Aurora".to_string(),
        organization_type: "ngo".to_string(),
        message: Some("Queremos una demostración".to_string()),
    }
}

/// [`Mailer`] that keeps every email in memory instead of sending it.
#[derive(Debug, Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<OutgoingEmail>>,
    fail: bool,
}

impl RecordingMailer {
    /// A mailer that rejects every send.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            sent: Mutex::default(),
            fail: true,
        }
    }

    /// Emails accepted so far, in send order.
    #[allow(clippy::unwrap_used)]
    pub fn sent(&self) -> Vec<OutgoingEmail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    #[allow(clippy::unwrap_used)]
    async fn send(&self, email: &OutgoingEmail) -> Result<serde_json::Value> {
        if self.fail {
            return Err(Error::Email {
                message: "provider rejected the message".to_string(),
            });
        }
        let mut sent = self.sent.lock().unwrap();
        sent.push(email.clone());
        Ok(serde_json::json!({ "id": format!("email-{}", sent.len()) }))
    }
}
