use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub full_name: Option<String>,
    pub role: String,
    pub is_active: bool,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::user_permission_overrides::Entity")]
    PermissionOverrides,
    #[sea_orm(has_many = "super::permission_grants::Entity")]
    PermissionGrants,
    #[sea_orm(has_many = "super::permission_revokes::Entity")]
    PermissionRevokes,
}

impl Related<super::user_permission_overrides::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PermissionOverrides.def()
    }
}

impl Related<super::permission_grants::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PermissionGrants.def()
    }
}

impl Related<super::permission_revokes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PermissionRevokes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
