//! Audit log entity - Append-only trail of administrative actions.
//!
//! Listing is newest first; see [`crate::core::admin::get_audit_logs`].

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Impact of an audited action
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Routine
    #[sea_orm(string_value = "low")]
    Low,
    /// Changes data
    #[sea_orm(string_value = "medium")]
    Medium,
    /// Moves money or removes data
    #[sea_orm(string_value = "high")]
    High,
    /// Needs immediate attention
    #[sea_orm(string_value = "critical")]
    Critical,
}

/// Audit log database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "audit_logs")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Sequence number; later entries have larger ids
    #[sea_orm(primary_key)]
    pub id: i64,
    /// When the action happened
    pub timestamp: DateTimeUtc,
    /// Acting user id
    pub user_id: String,
    /// Acting user display name
    pub user_name: String,
    /// Action code (e.g., `"CREATE_USER"`)
    pub action: String,
    /// Affected entity kind (e.g., `"Usuario"`)
    pub entity: String,
    /// Affected entity id, if any
    pub entity_id: Option<String>,
    /// Human-readable description
    pub details: String,
    /// Client address
    pub ip_address: String,
    /// Client user agent
    pub user_agent: String,
    /// Impact
    pub severity: Severity,
}

/// Audit logs have no enforced relationships
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
