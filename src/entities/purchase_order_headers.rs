use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "purchase_order_headers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub po_header_id: i64,
    #[sea_orm(unique)]
    pub po_number: String,
    pub buyer_code: String,
    /// DRAFT | PARTIALLY_SHIPPED | SHIPPED | CANCELLED
    pub status: String,
    pub cancel_reason: Option<String>,
    pub cancel_note: Option<String>,
    pub cancel_date: Option<NaiveDate>,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::purchase_order_lines::Entity")]
    PurchaseOrderLines,
}

impl Related<super::purchase_order_lines::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PurchaseOrderLines.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
