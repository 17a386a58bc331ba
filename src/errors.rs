//! Unified error types for the dashboard services.
//!
//! Every fallible operation in `core`, `config` and `api` returns [`Result<T>`]. The HTTP
//! layer translates these variants into status codes in [`crate::api::error`].

use thiserror::Error;

/// All errors the dashboard can produce.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration file could not be read or parsed
    #[error("Configuration error: {message}")]
    Config {
        /// Human-readable description of the problem
        message: String,
    },

    /// Underlying SeaORM/sqlx failure
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// JSON (de)serialization failure for stored documents or tokens
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O failure (binding the listener, reading files)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Email template could not be rendered
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),

    /// Required environment variable missing or malformed
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    /// No budget with the given id
    #[error("Budget '{id}' not found")]
    BudgetNotFound {
        /// Requested budget id
        id: String,
    },

    /// No budget item with the given id inside the addressed budget
    #[error("Budget item '{id}' not found")]
    BudgetItemNotFound {
        /// Requested item id
        id: String,
    },

    /// No transfer with the given id
    #[error("Transfer '{id}' not found")]
    TransferNotFound {
        /// Requested transfer id
        id: String,
    },

    /// Transfer was already approved or rejected
    #[error("Transfer '{id}' is already {status}")]
    TransferNotPending {
        /// Transfer id
        id: String,
        /// Current status of the transfer
        status: String,
    },

    /// No system user / account with the given id
    #[error("User '{id}' not found")]
    UserNotFound {
        /// Requested user id
        id: String,
    },

    /// No report with the given id
    #[error("Report '{id}' not found")]
    ReportNotFound {
        /// Requested report id
        id: String,
    },

    /// Registration with an email that already has an account
    #[error("El usuario ya existe: {email}")]
    UserAlreadyExists {
        /// Duplicate email
        email: String,
    },

    /// Login with an unknown email or wrong password
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Amount that is not a finite number, or not positive where required
    #[error("Invalid amount: {amount}")]
    InvalidAmount {
        /// Offending amount
        amount: f64,
    },

    /// Email provider rejected or failed a send
    #[error("Email delivery failed: {message}")]
    Email {
        /// Provider message
        message: String,
    },

    /// HTTP client failure talking to the email provider
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
