//! Budget item entity - A single line of a budget.
//!
//! `available_amount`, `percentage` and `status` are derived from `budget_amount` and
//! `spent_amount` by [`crate::core::status::derive`] whenever an item is written through
//! the budget or transfer services.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Health of a budget line, ordered by severity
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    /// Below 75% spent
    #[sea_orm(string_value = "healthy")]
    Healthy,
    /// 75% up to (not including) 90%
    #[sea_orm(string_value = "warning")]
    Warning,
    /// 90% up to and including 100%
    #[sea_orm(string_value = "critical")]
    Critical,
    /// Over 100%
    #[sea_orm(string_value = "exceeded")]
    Exceeded,
}

/// Budget item database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "budget_items")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Identifier such as `"item-1"`
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Owning budget
    pub budget_id: String,
    /// Position inside the budget; items are listed in ascending order
    pub position: i32,
    /// Accounting code (e.g., `"OP-001"`)
    pub code: String,
    /// Display name
    pub name: String,
    /// Spending category
    pub category: String,
    /// Responsible department
    pub department: String,
    /// Planned amount
    pub budget_amount: f64,
    /// Executed amount
    pub spent_amount: f64,
    /// `budget_amount - spent_amount`, may be negative
    pub available_amount: f64,
    /// Rounded spent/budget ratio in percent
    pub percentage: i32,
    /// Derived health label
    pub status: ItemStatus,
    /// Last mutation timestamp
    pub last_modified: DateTimeUtc,
    /// Display name of the creator
    pub created_by: String,
}

/// Defines relationships between `BudgetItem` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each item belongs to one budget
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
