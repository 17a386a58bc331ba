//! Session entity - Issued login tokens, keyed by the token string itself.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Session database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sessions")]
pub struct Model {
    /// Base64 token handed to the client
    #[sea_orm(primary_key, auto_increment = false)]
    pub token: String,
    /// Account the token was issued for
    pub user_id: String,
    /// Issue timestamp, mirrors the timestamp inside the token
    pub issued_at: DateTimeUtc,
}

/// Sessions have no enforced relationships
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
