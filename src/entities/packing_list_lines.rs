use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Maintained (not constrained) totals: `gw = gw_per_ctn * cartons` and
/// `nw = nw_per_ctn * cartons`, rounded to 3 decimals. Callers that change
/// cartons or per-carton weights must recompute both.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "packing_list_lines")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub packing_line_id: i64,
    pub packing_list_id: i64,
    pub line_no: i32,
    pub description: Option<String>,
    pub cartons: i32,
    pub shipped_qty: i32,
    pub gw_per_ctn: Decimal,
    pub nw_per_ctn: Decimal,
    pub gw: Decimal,
    pub nw: Decimal,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::packing_lists::Entity",
        from = "Column::PackingListId",
        to = "super::packing_lists::Column::PackingListId"
    )]
    PackingList,
}

impl Related<super::packing_lists::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PackingList.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
