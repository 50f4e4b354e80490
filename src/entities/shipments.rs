use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "shipments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub shipment_id: i64,
    #[sea_orm(unique)]
    pub shipment_no: String,
    pub shipped_date: Option<NaiveDate>,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::shipment_lines::Entity")]
    ShipmentLines,
}

impl Related<super::shipment_lines::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ShipmentLines.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
