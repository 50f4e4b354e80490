use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Invoice header with a revision chain. `revision_of_invoice_id` points at
/// the root header (NULL on the root itself); exactly one row per chain has
/// `is_latest = true` and revision numbers are strictly increasing from 1.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "invoices")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub invoice_id: i64,
    pub invoice_no: String,
    pub buyer_code: String,
    /// DRAFT | CONFIRMED
    pub status: String,
    pub revision_of_invoice_id: Option<i64>,
    pub revision_no: i32,
    pub is_latest: bool,
    pub currency: Option<String>,
    pub incoterm: Option<String>,
    pub consignee: Option<String>,
    /// Legacy consignee column; still read as a fallback when `consignee`
    /// is empty on older rows.
    pub ship_to: Option<String>,
    pub remarks: Option<String>,
    pub confirmed_at: Option<DateTime<Utc>>,
    pub confirmed_by: Option<String>,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::invoice_lines::Entity")]
    InvoiceLines,
}

impl Related<super::invoice_lines::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::InvoiceLines.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
