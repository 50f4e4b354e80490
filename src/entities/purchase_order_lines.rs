use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Invariant maintained by the order lifecycle rules:
/// `ordered_qty = shipped + cancelled_qty + remaining`, remaining >= 0,
/// where shipped is derived from non-deleted shipment lines.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "purchase_order_lines")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub po_line_id: i64,
    pub po_header_id: i64,
    pub line_no: i32,
    pub style_id: Option<i64>,
    pub description: Option<String>,
    pub ordered_qty: i32,
    pub cancelled_qty: i32,
    pub unit_price: Option<Decimal>,
    /// JSON array of public image URLs, capped at 3, most recent first
    pub image_urls: Option<Json>,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::purchase_order_headers::Entity",
        from = "Column::PoHeaderId",
        to = "super::purchase_order_headers::Column::PoHeaderId"
    )]
    PurchaseOrderHeader,
    #[sea_orm(
        belongs_to = "super::styles::Entity",
        from = "Column::StyleId",
        to = "super::styles::Column::StyleId"
    )]
    Style,
    #[sea_orm(has_many = "super::shipment_lines::Entity")]
    ShipmentLines,
}

impl Related<super::purchase_order_headers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PurchaseOrderHeader.def()
    }
}

impl Related<super::styles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Style.def()
    }
}

impl Related<super::shipment_lines::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ShipmentLines.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
