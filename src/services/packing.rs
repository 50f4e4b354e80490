use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use std::sync::Arc;
use tracing::{info, instrument};

use crate::db::DbPool;
use crate::entities::{packing_list_lines, packing_lists};
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};

/// Total weight for a line: per-carton weight times cartons, rounded to
/// 3 decimal places.
pub fn line_weight(per_ctn: Decimal, cartons: i32) -> Decimal {
    (per_ctn * Decimal::from(cartons)).round_dp(3)
}

#[derive(Debug, Clone)]
pub struct NewPackingLine {
    pub line_no: i32,
    pub description: Option<String>,
    pub cartons: i32,
    pub shipped_qty: i32,
    pub gw_per_ctn: Decimal,
    pub nw_per_ctn: Decimal,
}

#[derive(Debug, Clone)]
pub struct NewPackingList {
    pub packing_list_no: String,
    pub invoice_id: Option<i64>,
    pub lines: Vec<NewPackingLine>,
}

/// Parameters for splitting one packing line into two.
#[derive(Debug, Clone)]
pub struct SplitRequest {
    pub line_id: i64,
    pub split_cartons: i32,
    pub split_qty: i32,
    pub split_gw_per_ctn: Option<Decimal>,
    pub split_nw_per_ctn: Option<Decimal>,
    pub split_description_suffix: Option<String>,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct SplitOutcome {
    pub packing_list_id: i64,
    pub original_line: packing_list_lines::Model,
    pub split_line: packing_list_lines::Model,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct PackingListView {
    #[serde(flatten)]
    pub header: packing_lists::Model,
    pub lines: Vec<packing_list_lines::Model>,
}

/// Packing list operations, most notably splitting a line into two while
/// keeping carton counts, quantities and weights consistent.
pub struct PackingService {
    db: Arc<DbPool>,
    event_sender: EventSender,
}

impl PackingService {
    pub fn new(db: Arc<DbPool>, event_sender: EventSender) -> Self {
        Self { db, event_sender }
    }

    #[instrument(skip(self, input), fields(packing_list_no = %input.packing_list_no))]
    pub async fn create_packing_list(
        &self,
        input: NewPackingList,
    ) -> Result<PackingListView, ServiceError> {
        if input.lines.is_empty() {
            return Err(ServiceError::ValidationError(
                "A packing list needs at least one line".to_string(),
            ));
        }
        for line in &input.lines {
            if line.cartons <= 0 || line.shipped_qty <= 0 {
                return Err(ServiceError::ValidationError(format!(
                    "Line {}: cartons and shipped_qty must be positive",
                    line.line_no
                )));
            }
        }

        let duplicate = packing_lists::Entity::find()
            .filter(packing_lists::Column::PackingListNo.eq(&input.packing_list_no))
            .filter(packing_lists::Column::IsDeleted.eq(false))
            .one(&*self.db)
            .await?;
        if duplicate.is_some() {
            return Err(ServiceError::Conflict(format!(
                "Packing list {} already exists",
                input.packing_list_no
            )));
        }

        let txn = self.db.begin().await?;
        let now = Utc::now();

        let header = packing_lists::ActiveModel {
            packing_list_no: Set(input.packing_list_no.clone()),
            invoice_id: Set(input.invoice_id),
            is_deleted: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        let mut lines = Vec::with_capacity(input.lines.len());
        for line in input.lines {
            let model = packing_list_lines::ActiveModel {
                packing_list_id: Set(header.packing_list_id),
                line_no: Set(line.line_no),
                description: Set(line.description),
                cartons: Set(line.cartons),
                shipped_qty: Set(line.shipped_qty),
                gw_per_ctn: Set(line.gw_per_ctn),
                nw_per_ctn: Set(line.nw_per_ctn),
                gw: Set(line_weight(line.gw_per_ctn, line.cartons)),
                nw: Set(line_weight(line.nw_per_ctn, line.cartons)),
                is_deleted: Set(false),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
            lines.push(model);
        }

        txn.commit().await?;
        info!(packing_list_id = header.packing_list_id, "packing list created");
        Ok(PackingListView { header, lines })
    }

    #[instrument(skip(self))]
    pub async fn get_packing_list(
        &self,
        packing_list_id: i64,
    ) -> Result<PackingListView, ServiceError> {
        let header = packing_lists::Entity::find_by_id(packing_list_id)
            .filter(packing_lists::Column::IsDeleted.eq(false))
            .one(&*self.db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Packing list {} not found", packing_list_id))
            })?;
        let lines = packing_list_lines::Entity::find()
            .filter(packing_list_lines::Column::PackingListId.eq(packing_list_id))
            .filter(packing_list_lines::Column::IsDeleted.eq(false))
            .order_by_asc(packing_list_lines::Column::LineNo)
            .all(&*self.db)
            .await?;
        Ok(PackingListView { header, lines })
    }

    /// Split one line into two: the new line takes the requested cartons and
    /// quantity (with optionally distinct per-carton weights), the original
    /// shrinks by the same amounts, and both lines' weight totals are
    /// recomputed. The split must leave something on the original line.
    #[instrument(skip(self, req), fields(line_id = req.line_id))]
    pub async fn split_line(
        &self,
        packing_list_id: i64,
        req: SplitRequest,
    ) -> Result<SplitOutcome, ServiceError> {
        if req.split_cartons <= 0 || req.split_qty <= 0 {
            return Err(ServiceError::ValidationError(
                "split_cartons and split_qty must be positive".to_string(),
            ));
        }

        let txn = self.db.begin().await?;

        packing_lists::Entity::find_by_id(packing_list_id)
            .filter(packing_lists::Column::IsDeleted.eq(false))
            .one(&txn)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Packing list {} not found", packing_list_id))
            })?;

        let source = packing_list_lines::Entity::find_by_id(req.line_id)
            .filter(packing_list_lines::Column::PackingListId.eq(packing_list_id))
            .filter(packing_list_lines::Column::IsDeleted.eq(false))
            .one(&txn)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!(
                    "Line {} not found on packing list {}",
                    req.line_id, packing_list_id
                ))
            })?;

        if req.split_cartons >= source.cartons || req.split_qty >= source.shipped_qty {
            let details = serde_json::json!({
                "packing_line_id": source.packing_line_id,
                "line_no": source.line_no,
                "cartons": source.cartons,
                "shipped_qty": source.shipped_qty,
                "requested_cartons": req.split_cartons,
                "requested_qty": req.split_qty,
            });
            return Err(ServiceError::conflict_with_details(
                format!(
                    "Split of {} cartons / {} qty must leave part of the line's {} cartons / {} qty",
                    req.split_cartons, req.split_qty, source.cartons, source.shipped_qty
                ),
                details,
            ));
        }

        let max_line_no = packing_list_lines::Entity::find()
            .filter(packing_list_lines::Column::PackingListId.eq(packing_list_id))
            .filter(packing_list_lines::Column::IsDeleted.eq(false))
            .all(&txn)
            .await?
            .iter()
            .map(|l| l.line_no)
            .max()
            .unwrap_or(0);

        let now = Utc::now();
        let split_gw_per_ctn = req.split_gw_per_ctn.unwrap_or(source.gw_per_ctn);
        let split_nw_per_ctn = req.split_nw_per_ctn.unwrap_or(source.nw_per_ctn);
        let split_description = match (&source.description, &req.split_description_suffix) {
            (Some(desc), Some(suffix)) => Some(format!("{}{}", desc, suffix)),
            (Some(desc), None) => Some(desc.clone()),
            (None, Some(suffix)) => Some(suffix.clone()),
            (None, None) => None,
        };

        let split_line = packing_list_lines::ActiveModel {
            packing_list_id: Set(packing_list_id),
            line_no: Set(max_line_no + 1),
            description: Set(split_description),
            cartons: Set(req.split_cartons),
            shipped_qty: Set(req.split_qty),
            gw_per_ctn: Set(split_gw_per_ctn),
            nw_per_ctn: Set(split_nw_per_ctn),
            gw: Set(line_weight(split_gw_per_ctn, req.split_cartons)),
            nw: Set(line_weight(split_nw_per_ctn, req.split_cartons)),
            is_deleted: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        let remaining_cartons = source.cartons - req.split_cartons;
        let remaining_qty = source.shipped_qty - req.split_qty;
        let gw_per_ctn = source.gw_per_ctn;
        let nw_per_ctn = source.nw_per_ctn;

        let mut active: packing_list_lines::ActiveModel = source.into();
        active.cartons = Set(remaining_cartons);
        active.shipped_qty = Set(remaining_qty);
        active.gw = Set(line_weight(gw_per_ctn, remaining_cartons));
        active.nw = Set(line_weight(nw_per_ctn, remaining_cartons));
        active.updated_at = Set(now);
        let original_line = active.update(&txn).await?;

        txn.commit().await?;

        info!(
            packing_list_id,
            original_line = original_line.packing_line_id,
            split_line = split_line.packing_line_id,
            "packing line split"
        );
        self.event_sender
            .send(Event::PackingLineSplit {
                packing_list_id,
                source_line_id: original_line.packing_line_id,
                new_line_id: split_line.packing_line_id,
            })
            .await;

        Ok(SplitOutcome {
            packing_list_id,
            original_line,
            split_line,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn weight_is_per_carton_times_cartons() {
        assert_eq!(line_weight(dec!(12.5), 10), dec!(125.000));
    }

    #[test]
    fn weight_rounds_to_three_decimals() {
        assert_eq!(line_weight(dec!(0.3333), 3), dec!(1.000));
        assert_eq!(line_weight(dec!(1.23456), 2), dec!(2.469));
    }

    #[test]
    fn zero_cartons_weigh_nothing() {
        assert_eq!(line_weight(dec!(9.99), 0), dec!(0.000));
    }
}
