use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Runtime-editable role default: (role, perm_key) -> allowed.
/// When no rows exist for a role the resolver falls back to the static table.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "role_permissions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub role: String,
    pub perm_key: String,
    pub allowed: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
