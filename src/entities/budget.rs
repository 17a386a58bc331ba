//! Budget entity - One fiscal-year budget with cached aggregate totals.
//!
//! The totals are recomputed from the items only on the item mutation paths in
//! [`crate::core::budget`]; seeded budgets keep whatever totals they were given.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Lifecycle of a budget
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum BudgetStatus {
    /// Being prepared, not yet in force
    #[sea_orm(string_value = "draft")]
    Draft,
    /// The budget transfers are applied against
    #[sea_orm(string_value = "active")]
    Active,
    /// Fiscal year finished
    #[sea_orm(string_value = "closed")]
    Closed,
    /// Kept for reference only
    #[sea_orm(string_value = "archived")]
    Archived,
}

/// Budget database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "budgets")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Identifier such as `"budget-2024"`
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Display name (e.g., "Presupuesto Anual 2024")
    pub name: String,
    /// Fiscal year
    pub year: i32,
    /// Lifecycle status
    pub status: BudgetStatus,
    /// Sum of item budget amounts
    pub total_budget: f64,
    /// Sum of item spent amounts
    pub total_spent: f64,
    /// `total_budget - total_spent`
    pub total_available: f64,
    /// ISO currency code
    pub currency: String,
    /// Creation timestamp
    pub created_at: DateTimeUtc,
    /// Display name of the creator
    pub created_by: String,
    /// Last mutation timestamp
    pub last_modified: DateTimeUtc,
}

/// Defines relationships between Budget and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One budget has many line items
    #[sea_orm(has_many = "super::budget_item::Entity")]
    Items,
    /// One budget has many approval records
    #[sea_orm(has_many = "super::budget_approval::Entity")]
    Approvals,
}

impl Related<super::budget_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Items.def()
    }
}

impl Related<super::budget_approval::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Approvals.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
