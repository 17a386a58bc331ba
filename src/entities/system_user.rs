//! System user entity - Staff records managed from the admin panel.
//!
//! These are separate from login [`super::account`]s: the admin panel manages a directory,
//! not credentials.

use super::account::Role;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Whether a system user may work in the dashboard
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    /// Enabled
    #[sea_orm(string_value = "active")]
    Active,
    /// Disabled by an administrator
    #[sea_orm(string_value = "inactive")]
    Inactive,
    /// Blocked
    #[sea_orm(string_value = "suspended")]
    Suspended,
}

/// System user database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "system_users")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// User identifier
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Full name
    pub name: String,
    /// Contact email
    pub email: String,
    /// Assigned role
    pub role: Role,
    /// Account state
    pub status: UserStatus,
    /// Most recent login, if any
    pub last_login: Option<DateTimeUtc>,
    /// Creation timestamp
    pub created_at: DateTimeUtc,
    /// Granted permission names, stored as a JSON array of strings
    pub permissions: Json,
    /// Department, if any
    pub department: Option<String>,
    /// Phone number, if any
    pub phone: Option<String>,
}

/// System users have no enforced relationships
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
