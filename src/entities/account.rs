//! Account entity - Users that can log into the dashboard.
//!
//! There are no password hashes: every account shares the demo password checked in
//! [`crate::core::auth`].

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Dashboard role, from most to least privileged
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Full access
    #[sea_orm(string_value = "administrador")]
    Administrador,
    /// Budgets, transfers and reports
    #[sea_orm(string_value = "financiero")]
    Financiero,
    /// Reports and audit trail
    #[sea_orm(string_value = "auditor")]
    Auditor,
    /// Reports only
    #[sea_orm(string_value = "invitado")]
    Invitado,
}

impl Role {
    /// Position in the hierarchy; higher outranks lower.
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::Administrador => 4,
            Self::Financiero => 3,
            Self::Auditor => 2,
            Self::Invitado => 1,
        }
    }

    /// Resources this role may open. `"all"` grants everything.
    #[must_use]
    pub const fn permissions(self) -> &'static [&'static str] {
        match self {
            Self::Administrador => &["all"],
            Self::Financiero => &["budgets", "reports", "transfers"],
            Self::Auditor => &["reports", "audit"],
            Self::Invitado => &["reports"],
        }
    }
}

/// Account database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "accounts")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Account identifier
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Login email
    #[sea_orm(unique)]
    pub email: String,
    /// Display name
    pub name: String,
    /// Dashboard role
    pub role: Role,
    /// Company the user belongs to
    pub company: String,
    /// Optional avatar URL
    pub avatar: Option<String>,
    /// Registration timestamp
    pub created_at: DateTimeUtc,
    /// Most recent successful login
    pub last_login: DateTimeUtc,
}

/// Accounts have no enforced relationships
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
