use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use std::sync::Arc;
use tracing::{info, instrument};

use crate::db::DbPool;
use crate::entities::{purchase_order_headers, purchase_order_lines, shipment_lines, shipments};
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};

/// One line's quantity triple used by [`compute_po_status`].
#[derive(Debug, Clone, Copy)]
pub struct LineQuantities {
    pub ordered: i32,
    pub shipped: i32,
    pub cancelled: i32,
}

impl LineQuantities {
    pub fn remaining(&self) -> i32 {
        self.ordered - self.shipped - self.cancelled
    }
}

/// Derive the header status from its lines' quantities. `None` means no
/// transition applies and the current status stands.
///
/// The computation is idempotent: it depends only on the current quantities,
/// so re-running it with no new shipments or cancellations yields the same
/// status.
pub fn compute_po_status(lines: &[LineQuantities]) -> Option<&'static str> {
    if lines.is_empty() {
        return None;
    }
    let total_shipped: i64 = lines.iter().map(|l| l.shipped as i64).sum();
    let all_settled = lines.iter().all(|l| l.remaining() <= 0);

    match (all_settled, total_shipped > 0) {
        (true, true) => Some("SHIPPED"),
        (true, false) => Some("CANCELLED"),
        (false, true) => Some("PARTIALLY_SHIPPED"),
        (false, false) => None,
    }
}

#[derive(Debug, Clone)]
pub struct NewOrderLine {
    pub line_no: i32,
    pub style_id: Option<i64>,
    pub description: Option<String>,
    pub ordered_qty: i32,
    pub unit_price: Option<Decimal>,
}

#[derive(Debug, Clone)]
pub struct NewPurchaseOrder {
    pub po_number: String,
    pub buyer_code: String,
    pub lines: Vec<NewOrderLine>,
}

/// One requested cancellation within a batch. `qty_cancelled` is the
/// absolute cancelled quantity the line should end up with.
#[derive(Debug, Clone)]
pub struct LineCancellation {
    pub po_line_id: i64,
    pub qty_cancelled: i32,
}

#[derive(Debug, Clone, Default)]
pub struct CancelContext {
    pub cancel_reason: Option<String>,
    pub cancel_note: Option<String>,
    pub cancel_date: Option<NaiveDate>,
}

/// A PO line together with its derived shipped and remaining quantities.
#[derive(Debug, Clone, serde::Serialize)]
pub struct OrderLineView {
    #[serde(flatten)]
    pub line: purchase_order_lines::Model,
    pub shipped_qty: i32,
    pub remaining_qty: i32,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct OrderView {
    #[serde(flatten)]
    pub header: purchase_order_headers::Model,
    pub lines: Vec<OrderLineView>,
}

#[derive(Debug, Clone)]
pub struct NewShipmentLine {
    pub po_line_id: i64,
    pub shipped_qty: i32,
}

#[derive(Debug, Clone)]
pub struct NewShipment {
    pub shipment_no: String,
    pub shipped_date: Option<NaiveDate>,
    pub lines: Vec<NewShipmentLine>,
}

/// Purchase order and shipment operations: creation, lookup with derived
/// quantities, batch line cancellation and header status recomputation.
pub struct OrderService {
    db: Arc<DbPool>,
    event_sender: EventSender,
}

impl OrderService {
    pub fn new(db: Arc<DbPool>, event_sender: EventSender) -> Self {
        Self { db, event_sender }
    }

    #[instrument(skip(self, input), fields(po_number = %input.po_number))]
    pub async fn create_purchase_order(
        &self,
        input: NewPurchaseOrder,
    ) -> Result<OrderView, ServiceError> {
        if input.lines.is_empty() {
            return Err(ServiceError::ValidationError(
                "A purchase order needs at least one line".to_string(),
            ));
        }
        for line in &input.lines {
            if line.ordered_qty <= 0 {
                return Err(ServiceError::ValidationError(format!(
                    "Line {}: ordered_qty must be positive",
                    line.line_no
                )));
            }
        }

        let existing = purchase_order_headers::Entity::find()
            .filter(purchase_order_headers::Column::PoNumber.eq(&input.po_number))
            .filter(purchase_order_headers::Column::IsDeleted.eq(false))
            .one(&*self.db)
            .await?;
        if existing.is_some() {
            return Err(ServiceError::Conflict(format!(
                "Purchase order {} already exists",
                input.po_number
            )));
        }

        let txn = self.db.begin().await?;
        let now = Utc::now();

        let header = purchase_order_headers::ActiveModel {
            po_number: Set(input.po_number.clone()),
            buyer_code: Set(input.buyer_code.clone()),
            status: Set("DRAFT".to_string()),
            is_deleted: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        let mut lines = Vec::with_capacity(input.lines.len());
        for line in input.lines {
            let model = purchase_order_lines::ActiveModel {
                po_header_id: Set(header.po_header_id),
                line_no: Set(line.line_no),
                style_id: Set(line.style_id),
                description: Set(line.description),
                ordered_qty: Set(line.ordered_qty),
                cancelled_qty: Set(0),
                unit_price: Set(line.unit_price),
                is_deleted: Set(false),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
            lines.push(OrderLineView {
                shipped_qty: 0,
                remaining_qty: model.ordered_qty,
                line: model,
            });
        }

        txn.commit().await?;

        info!(po_header_id = header.po_header_id, "purchase order created");
        self.event_sender
            .send(Event::PurchaseOrderCreated {
                po_header_id: header.po_header_id,
                po_number: header.po_number.clone(),
            })
            .await;

        Ok(OrderView { header, lines })
    }

    #[instrument(skip(self))]
    pub async fn get_purchase_order(&self, po_number: &str) -> Result<OrderView, ServiceError> {
        let header = self.find_header(po_number).await?;
        let lines = self.load_line_views(header.po_header_id).await?;
        Ok(OrderView { header, lines })
    }

    #[instrument(skip(self))]
    pub async fn list_purchase_orders(
        &self,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<purchase_order_headers::Model>, u64), ServiceError> {
        let paginator = purchase_order_headers::Entity::find()
            .filter(purchase_order_headers::Column::IsDeleted.eq(false))
            .order_by_desc(purchase_order_headers::Column::PoHeaderId)
            .paginate(&*self.db, per_page);
        let total = paginator.num_items().await?;
        let headers = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((headers, total))
    }

    /// Apply a batch of line cancellations atomically, then recompute the
    /// header status. Any over-cancel rejects the whole batch with a 409
    /// carrying the per-line quantity breakdown, leaving every line untouched.
    #[instrument(skip(self, batch, ctx), fields(lines = batch.len()))]
    pub async fn cancel_lines(
        &self,
        po_number: &str,
        batch: Vec<LineCancellation>,
        ctx: CancelContext,
    ) -> Result<OrderView, ServiceError> {
        if batch.is_empty() {
            return Err(ServiceError::ValidationError(
                "No line cancellations supplied".to_string(),
            ));
        }
        for req in &batch {
            if req.qty_cancelled < 0 {
                return Err(ServiceError::ValidationError(format!(
                    "Line {}: qty_cancelled must be non-negative",
                    req.po_line_id
                )));
            }
        }

        let header = self.find_header(po_number).await?;
        let txn = self.db.begin().await?;

        let lines = purchase_order_lines::Entity::find()
            .filter(purchase_order_lines::Column::PoHeaderId.eq(header.po_header_id))
            .filter(purchase_order_lines::Column::IsDeleted.eq(false))
            .all(&txn)
            .await?;

        // Validate the full batch before mutating anything.
        for req in &batch {
            let line = lines
                .iter()
                .find(|l| l.po_line_id == req.po_line_id)
                .ok_or_else(|| {
                    ServiceError::NotFound(format!(
                        "Line {} not found on purchase order {}",
                        req.po_line_id, po_number
                    ))
                })?;
            let shipped = self.shipped_for_line(&txn, line.po_line_id).await?;
            let max_cancel = (line.ordered_qty - shipped).max(0);
            if req.qty_cancelled > max_cancel {
                let details = serde_json::json!({
                    "po_line_id": line.po_line_id,
                    "line_no": line.line_no,
                    "ordered": line.ordered_qty,
                    "shipped": shipped,
                    "max_cancel": max_cancel,
                    "requested": req.qty_cancelled,
                });
                return Err(ServiceError::conflict_with_details(
                    format!(
                        "Cannot cancel {} of line {}: only {} cancellable",
                        req.qty_cancelled, line.line_no, max_cancel
                    ),
                    details,
                ));
            }
        }

        let now = Utc::now();
        for req in &batch {
            let line = lines
                .iter()
                .find(|l| l.po_line_id == req.po_line_id)
                .cloned()
                .ok_or_else(|| ServiceError::NotFound(format!("Line {}", req.po_line_id)))?;
            let mut active: purchase_order_lines::ActiveModel = line.into();
            active.cancelled_qty = Set(req.qty_cancelled);
            active.updated_at = Set(now);
            active.update(&txn).await?;
        }

        let status = self.recompute_status_in(&txn, header.po_header_id).await?;

        let mut active: purchase_order_headers::ActiveModel = header.clone().into();
        if let Some(status) = status {
            active.status = Set(status.to_string());
        }
        // Context fields only change when the request supplies them, so a
        // later batch cannot blank out an earlier cancellation's audit trail.
        if ctx.cancel_reason.is_some() {
            active.cancel_reason = Set(ctx.cancel_reason);
        }
        if ctx.cancel_note.is_some() {
            active.cancel_note = Set(ctx.cancel_note);
        }
        if ctx.cancel_date.is_some() {
            active.cancel_date = Set(ctx.cancel_date);
        } else if header.cancel_date.is_none() {
            active.cancel_date = Set(Some(now.date_naive()));
        }
        active.updated_at = Set(now);
        let header = active.update(&txn).await?;

        txn.commit().await?;

        info!(
            po_header_id = header.po_header_id,
            status = %header.status,
            "lines cancelled"
        );
        self.event_sender
            .send(Event::PurchaseOrderLinesCancelled {
                po_header_id: header.po_header_id,
                po_number: header.po_number.clone(),
                status: header.status.clone(),
            })
            .await;

        let lines = self.load_line_views(header.po_header_id).await?;
        Ok(OrderView { header, lines })
    }

    /// Record a shipment against existing PO lines, then recompute the
    /// status of every affected header.
    #[instrument(skip(self, input), fields(shipment_no = %input.shipment_no))]
    pub async fn create_shipment(
        &self,
        input: NewShipment,
    ) -> Result<shipments::Model, ServiceError> {
        if input.lines.is_empty() {
            return Err(ServiceError::ValidationError(
                "A shipment needs at least one line".to_string(),
            ));
        }
        for line in &input.lines {
            if line.shipped_qty <= 0 {
                return Err(ServiceError::ValidationError(
                    "shipped_qty must be positive".to_string(),
                ));
            }
        }

        let duplicate = shipments::Entity::find()
            .filter(shipments::Column::ShipmentNo.eq(&input.shipment_no))
            .filter(shipments::Column::IsDeleted.eq(false))
            .one(&*self.db)
            .await?;
        if duplicate.is_some() {
            return Err(ServiceError::Conflict(format!(
                "Shipment {} already exists",
                input.shipment_no
            )));
        }

        let txn = self.db.begin().await?;
        let now = Utc::now();

        let mut affected_headers: Vec<i64> = Vec::new();
        for line in &input.lines {
            let po_line = purchase_order_lines::Entity::find_by_id(line.po_line_id)
                .filter(purchase_order_lines::Column::IsDeleted.eq(false))
                .one(&txn)
                .await?
                .ok_or_else(|| {
                    ServiceError::NotFound(format!("PO line {} not found", line.po_line_id))
                })?;

            let shipped = self.shipped_for_line(&txn, po_line.po_line_id).await?;
            let remaining = po_line.ordered_qty - shipped - po_line.cancelled_qty;
            if line.shipped_qty > remaining {
                let details = serde_json::json!({
                    "po_line_id": po_line.po_line_id,
                    "ordered": po_line.ordered_qty,
                    "shipped": shipped,
                    "cancelled": po_line.cancelled_qty,
                    "remaining": remaining,
                    "requested": line.shipped_qty,
                });
                return Err(ServiceError::conflict_with_details(
                    format!(
                        "Cannot ship {} of line {}: only {} remaining",
                        line.shipped_qty, po_line.po_line_id, remaining
                    ),
                    details,
                ));
            }
            if !affected_headers.contains(&po_line.po_header_id) {
                affected_headers.push(po_line.po_header_id);
            }
        }

        let shipment = shipments::ActiveModel {
            shipment_no: Set(input.shipment_no.clone()),
            shipped_date: Set(input.shipped_date),
            is_deleted: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        for line in &input.lines {
            shipment_lines::ActiveModel {
                shipment_id: Set(shipment.shipment_id),
                po_line_id: Set(line.po_line_id),
                shipped_qty: Set(line.shipped_qty),
                is_deleted: Set(false),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
        }

        for header_id in affected_headers {
            let status = self.recompute_status_in(&txn, header_id).await?;
            let header = purchase_order_headers::Entity::find_by_id(header_id)
                .one(&txn)
                .await?
                .ok_or_else(|| ServiceError::NotFound(format!("PO header {}", header_id)))?;
            if let Some(status) = status {
                if header.status != status {
                    let mut active: purchase_order_headers::ActiveModel = header.into();
                    active.status = Set(status.to_string());
                    active.updated_at = Set(now);
                    active.update(&txn).await?;
                }
            }
        }

        txn.commit().await?;

        info!(shipment_id = shipment.shipment_id, "shipment created");
        self.event_sender
            .send(Event::ShipmentCreated {
                shipment_id: shipment.shipment_id,
                shipment_no: shipment.shipment_no.clone(),
            })
            .await;

        Ok(shipment)
    }

    #[instrument(skip(self))]
    pub async fn get_shipment(
        &self,
        shipment_id: i64,
    ) -> Result<(shipments::Model, Vec<shipment_lines::Model>), ServiceError> {
        let shipment = shipments::Entity::find_by_id(shipment_id)
            .filter(shipments::Column::IsDeleted.eq(false))
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Shipment {} not found", shipment_id)))?;
        let lines = shipment_lines::Entity::find()
            .filter(shipment_lines::Column::ShipmentId.eq(shipment_id))
            .filter(shipment_lines::Column::IsDeleted.eq(false))
            .all(&*self.db)
            .await?;
        Ok((shipment, lines))
    }

    async fn find_header(
        &self,
        po_number: &str,
    ) -> Result<purchase_order_headers::Model, ServiceError> {
        purchase_order_headers::Entity::find()
            .filter(purchase_order_headers::Column::PoNumber.eq(po_number))
            .filter(purchase_order_headers::Column::IsDeleted.eq(false))
            .one(&*self.db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Purchase order {} not found", po_number))
            })
    }

    async fn load_line_views(&self, header_id: i64) -> Result<Vec<OrderLineView>, ServiceError> {
        let lines = purchase_order_lines::Entity::find()
            .filter(purchase_order_lines::Column::PoHeaderId.eq(header_id))
            .filter(purchase_order_lines::Column::IsDeleted.eq(false))
            .order_by_asc(purchase_order_lines::Column::LineNo)
            .all(&*self.db)
            .await?;

        let mut views = Vec::with_capacity(lines.len());
        for line in lines {
            let shipped = self.shipped_for_line(&*self.db, line.po_line_id).await?;
            views.push(OrderLineView {
                shipped_qty: shipped,
                remaining_qty: line.ordered_qty - shipped - line.cancelled_qty,
                line,
            });
        }
        Ok(views)
    }

    async fn shipped_for_line<C: sea_orm::ConnectionTrait>(
        &self,
        conn: &C,
        po_line_id: i64,
    ) -> Result<i32, ServiceError> {
        let rows = shipment_lines::Entity::find()
            .filter(shipment_lines::Column::PoLineId.eq(po_line_id))
            .filter(shipment_lines::Column::IsDeleted.eq(false))
            .all(conn)
            .await?;
        Ok(rows.iter().map(|r| r.shipped_qty).sum())
    }

    async fn recompute_status_in<C: sea_orm::ConnectionTrait>(
        &self,
        conn: &C,
        header_id: i64,
    ) -> Result<Option<&'static str>, ServiceError> {
        let lines = purchase_order_lines::Entity::find()
            .filter(purchase_order_lines::Column::PoHeaderId.eq(header_id))
            .filter(purchase_order_lines::Column::IsDeleted.eq(false))
            .all(conn)
            .await?;

        let mut quantities = Vec::with_capacity(lines.len());
        for line in &lines {
            let shipped = self.shipped_for_line(conn, line.po_line_id).await?;
            quantities.push(LineQuantities {
                ordered: line.ordered_qty,
                shipped,
                cancelled: line.cancelled_qty,
            });
        }
        Ok(compute_po_status(&quantities))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q(ordered: i32, shipped: i32, cancelled: i32) -> LineQuantities {
        LineQuantities {
            ordered,
            shipped,
            cancelled,
        }
    }

    #[test]
    fn empty_order_has_no_transition() {
        assert_eq!(compute_po_status(&[]), None);
    }

    #[test]
    fn untouched_lines_leave_the_status_alone() {
        assert_eq!(compute_po_status(&[q(100, 0, 0), q(50, 0, 0)]), None);
    }

    #[test]
    fn open_lines_without_shipments_leave_the_status_alone() {
        // A previously settled order partially un-cancelled must not
        // transition anywhere; the stored status stands.
        assert_eq!(compute_po_status(&[q(100, 0, 50)]), None);
    }

    #[test]
    fn fully_shipped_is_shipped() {
        assert_eq!(
            compute_po_status(&[q(100, 100, 0), q(50, 20, 30)]),
            Some("SHIPPED")
        );
    }

    #[test]
    fn fully_cancelled_without_shipments_is_cancelled() {
        assert_eq!(
            compute_po_status(&[q(100, 0, 100), q(50, 0, 50)]),
            Some("CANCELLED")
        );
    }

    #[test]
    fn partial_shipment_with_open_lines_is_partially_shipped() {
        // Line 1: ship 60 then cancel 40 -> remaining 0; line 2 open.
        assert_eq!(
            compute_po_status(&[q(100, 60, 40), q(50, 0, 0)]),
            Some("PARTIALLY_SHIPPED")
        );
    }

    #[test]
    fn recompute_is_idempotent_on_same_quantities() {
        let lines = [q(100, 60, 40), q(50, 0, 0)];
        let first = compute_po_status(&lines);
        assert_eq!(compute_po_status(&lines), first);
    }
}
