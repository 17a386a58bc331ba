//! Budget transfer entity - A request to move budget from one item to another.
//!
//! Item ids are plain strings rather than foreign keys: a transfer outlives the
//! deletion of the items it names.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Review state of a transfer
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum TransferStatus {
    /// Waiting for review
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Applied to the active budget
    #[sea_orm(string_value = "approved")]
    Approved,
    /// Turned down, items untouched
    #[sea_orm(string_value = "rejected")]
    Rejected,
}

/// Budget transfer database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "budget_transfers")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Identifier such as `"transfer-1"`
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Item the amount is taken from
    pub from_item_id: String,
    /// Item the amount is added to
    pub to_item_id: String,
    /// Amount to move
    pub amount: f64,
    /// Justification given by the requester
    pub reason: String,
    /// Display name of the requester
    pub requested_by: String,
    /// Request timestamp
    pub requested_at: DateTimeUtc,
    /// Display name of the approver, once approved
    pub approved_by: Option<String>,
    /// Approval timestamp, once approved
    pub approved_at: Option<DateTimeUtc>,
    /// Review state
    pub status: TransferStatus,
    /// Reviewer remarks
    pub comments: Option<String>,
}

/// Transfers have no enforced relationships
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
