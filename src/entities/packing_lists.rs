use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "packing_lists")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub packing_list_id: i64,
    #[sea_orm(unique)]
    pub packing_list_no: String,
    pub invoice_id: Option<i64>,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::packing_list_lines::Entity")]
    PackingListLines,
}

impl Related<super::packing_list_lines::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PackingListLines.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
