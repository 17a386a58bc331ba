//! Budget approval entity - Sign-off records attached to a budget.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Outcome of an approval
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum ApprovalStatus {
    /// Awaiting decision
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Signed off
    #[sea_orm(string_value = "approved")]
    Approved,
    /// Turned down
    #[sea_orm(string_value = "rejected")]
    Rejected,
}

/// Budget approval database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "budget_approvals")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Identifier such as `"approval-1"`
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Approved budget
    pub budget_id: String,
    /// Display name of the approver
    pub approved_by: String,
    /// Decision timestamp
    pub approved_at: DateTimeUtc,
    /// Decision
    pub status: ApprovalStatus,
    /// Free-form remarks
    pub comments: Option<String>,
}

/// Defines relationships between `BudgetApproval` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each approval belongs to one budget
    #[sea_orm(
        belongs_to = "super::budget::Entity",
        from = "Column::BudgetId",
        to = "super::budget::Column::Id"
    )]
    Budget,
}

impl Related<super::budget::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Budget.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
