//! Core business logic - framework-agnostic budget, transfer, auth, admin and report
//! operations over the in-memory store.
//!
//! Every function takes the database connection explicitly and returns [`crate::errors::Result`],
//! so the same code backs the HTTP layer and the tests.

/// Administrative services: user directory, system configuration, audit trail
pub mod admin;
/// Mock authentication and advisory role checks
pub mod auth;
/// Budget and budget item management
pub mod budget;
/// Contact-form email forwarding
pub mod contact;
/// Saved reports and chart series
pub mod reports;
/// Demo data loaded at startup
pub mod seed;
/// Derived item fields (available amount, percentage, health status)
pub mod status;
/// Budget transfers between items
pub mod transfer;

use uuid::Uuid;

/// Builds a fresh identifier such as `item-3f2a...`.
#[must_use]
pub fn new_id(prefix: &str) -> String {
    format!("{prefix}-{}", Uuid::new_v4().simple())
}

/// Case-insensitive substring match used by the search filters.
#[must_use]
pub(crate) fn matches_term(haystack: &str, term: &str) -> bool {
    haystack.to_lowercase().contains(&term.to_lowercase())
}
