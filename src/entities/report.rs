//! Report entity - Saved report definitions listed on the reports page.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Kind of report
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum ReportType {
    /// Budget execution
    #[sea_orm(string_value = "execution")]
    Execution,
    /// Transfer activity
    #[sea_orm(string_value = "transfers")]
    Transfers,
    /// Change audit
    #[sea_orm(string_value = "audit")]
    Audit,
    /// User-defined
    #[sea_orm(string_value = "custom")]
    Custom,
}

/// Report database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "reports")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Report identifier
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Display name
    pub name: String,
    /// Kind of report
    #[serde(rename = "type")]
    pub report_type: ReportType,
    /// Short description
    pub description: String,
    /// Creation timestamp
    pub created_at: DateTimeUtc,
    /// Display name of the creator
    pub created_by: String,
    /// Report payload
    pub data: Json,
    /// Filters the report was generated with, see [`crate::core::reports::ReportFilters`]
    pub filters: Json,
}

/// Reports have no enforced relationships
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
