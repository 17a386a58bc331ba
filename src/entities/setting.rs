//! Settings entity - named JSON documents such as the admin panel's system configuration.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One stored settings document
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "settings")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Document name, e.g. `"system_config"`
    #[sea_orm(primary_key, auto_increment = false)]
    pub key: String,
    /// Serialized JSON document
    pub value: String,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
