use chrono::{Datelike, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use std::sync::Arc;
use tracing::{info, instrument};

use crate::db::DbPool;
use crate::entities::{invoice_lines, invoices};
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};

/// Build the next invoice number for a buyer and two-digit year, given the
/// invoice numbers already issued. Numbers follow `JMI-{buyer}-{yy}-{seq:04}`;
/// the sequence continues from the highest existing suffix under the same
/// prefix, ignoring numbers that do not parse.
pub fn next_invoice_number(buyer_code: &str, yy: u32, existing: &[String]) -> String {
    let prefix = format!("JMI-{}-{:02}-", buyer_code, yy % 100);
    let max_seq = existing
        .iter()
        .filter_map(|no| no.strip_prefix(&prefix))
        .filter_map(|suffix| suffix.parse::<u32>().ok())
        .max()
        .unwrap_or(0);
    format!("{}{:04}", prefix, max_seq + 1)
}

#[derive(Debug, Clone)]
pub struct NewInvoiceLine {
    pub line_no: i32,
    pub description: Option<String>,
    pub qty: i32,
    pub unit_price: Decimal,
}

#[derive(Debug, Clone)]
pub struct NewInvoice {
    pub buyer_code: String,
    pub currency: Option<String>,
    pub incoterm: Option<String>,
    pub consignee: Option<String>,
    pub remarks: Option<String>,
    pub lines: Vec<NewInvoiceLine>,
}

#[derive(Debug, Clone, Default)]
pub struct InvoiceLinePatch {
    pub description: Option<String>,
    pub qty: Option<i32>,
    pub unit_price: Option<Decimal>,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct InvoiceView {
    #[serde(flatten)]
    pub header: invoices::Model,
    pub lines: Vec<invoice_lines::Model>,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct RevisionOutcome {
    pub created: bool,
    pub root_invoice_id: i64,
    pub revision_no: i32,
    pub invoice_id: i64,
    pub invoice_no: String,
}

/// Invoice lifecycle: creation, the revision chain, confirmation, and
/// line edits on unconfirmed documents.
pub struct InvoicingService {
    db: Arc<DbPool>,
    event_sender: EventSender,
}

impl InvoicingService {
    pub fn new(db: Arc<DbPool>, event_sender: EventSender) -> Self {
        Self { db, event_sender }
    }

    #[instrument(skip(self, input), fields(buyer_code = %input.buyer_code))]
    pub async fn create_invoice(&self, input: NewInvoice) -> Result<InvoiceView, ServiceError> {
        if input.lines.is_empty() {
            return Err(ServiceError::ValidationError(
                "An invoice needs at least one line".to_string(),
            ));
        }
        for line in &input.lines {
            if line.qty <= 0 {
                return Err(ServiceError::ValidationError(format!(
                    "Line {}: qty must be positive",
                    line.line_no
                )));
            }
        }

        let txn = self.db.begin().await?;
        let now = Utc::now();
        let yy = now.year() as u32;
        let invoice_no = self
            .generate_invoice_number(&txn, &input.buyer_code, yy)
            .await?;

        let header = invoices::ActiveModel {
            invoice_no: Set(invoice_no),
            buyer_code: Set(input.buyer_code.clone()),
            status: Set("DRAFT".to_string()),
            revision_of_invoice_id: Set(None),
            revision_no: Set(1),
            is_latest: Set(true),
            currency: Set(input.currency),
            incoterm: Set(input.incoterm),
            consignee: Set(input.consignee),
            ship_to: Set(None),
            remarks: Set(input.remarks),
            confirmed_at: Set(None),
            confirmed_by: Set(None),
            is_deleted: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        let mut lines = Vec::with_capacity(input.lines.len());
        for line in input.lines {
            let amount = line.unit_price * Decimal::from(line.qty);
            let model = invoice_lines::ActiveModel {
                invoice_id: Set(header.invoice_id),
                line_no: Set(line.line_no),
                description: Set(line.description),
                qty: Set(line.qty),
                unit_price: Set(line.unit_price),
                amount: Set(amount),
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

        info!(invoice_id = header.invoice_id, invoice_no = %header.invoice_no, "invoice created");
        self.event_sender
            .send(Event::InvoiceCreated {
                invoice_id: header.invoice_id,
                invoice_no: header.invoice_no.clone(),
            })
            .await;

        Ok(InvoiceView { header, lines })
    }

    #[instrument(skip(self))]
    pub async fn get_invoice(&self, invoice_id: i64) -> Result<InvoiceView, ServiceError> {
        let header = self.find_invoice(&*self.db, invoice_id).await?;
        let lines = self.load_lines(&*self.db, invoice_id).await?;
        Ok(InvoiceView { header, lines })
    }

    /// Every header in the given invoice's revision chain, oldest first.
    #[instrument(skip(self))]
    pub async fn revision_chain(&self, invoice_id: i64) -> Result<Vec<invoices::Model>, ServiceError> {
        let invoice = self.find_invoice(&*self.db, invoice_id).await?;
        let root_id = invoice.revision_of_invoice_id.unwrap_or(invoice.invoice_id);
        self.chain_for_root(&*self.db, root_id).await
    }

    /// Create a new revision of the given invoice: a fresh DRAFT header with
    /// the next revision number and a new invoice number, copying carry-over
    /// fields and all non-deleted lines, and flipping `is_latest` onto it.
    /// Runs in one transaction so concurrent revision calls cannot interleave
    /// between the revision-number read and the insert.
    #[instrument(skip(self))]
    pub async fn create_revision(&self, invoice_id: i64) -> Result<RevisionOutcome, ServiceError> {
        let txn = self.db.begin().await?;

        let source = self.find_invoice(&txn, invoice_id).await?;
        let root_id = source.revision_of_invoice_id.unwrap_or(source.invoice_id);

        let chain = self.chain_for_root(&txn, root_id).await?;
        let next_revision_no = chain.iter().map(|i| i.revision_no).max().unwrap_or(0) + 1;

        let now = Utc::now();
        let yy = now.year() as u32;
        let invoice_no = self
            .generate_invoice_number(&txn, &source.buyer_code, yy)
            .await?;

        for existing in &chain {
            if existing.is_latest {
                let mut active: invoices::ActiveModel = existing.clone().into();
                active.is_latest = Set(false);
                active.updated_at = Set(now);
                active.update(&txn).await?;
            }
        }

        // Consignee carries over from the renamed field, falling back to the
        // legacy ship_to column when the renamed one was never populated.
        let consignee = source.consignee.clone().or_else(|| source.ship_to.clone());

        let new_header = invoices::ActiveModel {
            invoice_no: Set(invoice_no.clone()),
            buyer_code: Set(source.buyer_code.clone()),
            status: Set("DRAFT".to_string()),
            revision_of_invoice_id: Set(Some(root_id)),
            revision_no: Set(next_revision_no),
            is_latest: Set(true),
            currency: Set(source.currency.clone()),
            incoterm: Set(source.incoterm.clone()),
            consignee: Set(consignee),
            ship_to: Set(None),
            remarks: Set(source.remarks.clone()),
            confirmed_at: Set(None),
            confirmed_by: Set(None),
            is_deleted: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        let source_lines = self.load_lines(&txn, source.invoice_id).await?;
        for line in source_lines {
            invoice_lines::ActiveModel {
                invoice_id: Set(new_header.invoice_id),
                line_no: Set(line.line_no),
                description: Set(line.description),
                qty: Set(line.qty),
                unit_price: Set(line.unit_price),
                amount: Set(line.amount),
                is_deleted: Set(false),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
        }

        txn.commit().await?;

        info!(
            invoice_id = new_header.invoice_id,
            root_invoice_id = root_id,
            revision_no = next_revision_no,
            "invoice revision created"
        );
        self.event_sender
            .send(Event::InvoiceRevised {
                root_invoice_id: root_id,
                invoice_id: new_header.invoice_id,
                revision_no: next_revision_no,
            })
            .await;

        Ok(RevisionOutcome {
            created: true,
            root_invoice_id: root_id,
            revision_no: next_revision_no,
            invoice_id: new_header.invoice_id,
            invoice_no,
        })
    }

    /// Confirm an invoice, locking its lines against further edits.
    #[instrument(skip(self))]
    pub async fn confirm_invoice(
        &self,
        invoice_id: i64,
        confirmed_by: Option<String>,
    ) -> Result<invoices::Model, ServiceError> {
        let invoice = self.find_invoice(&*self.db, invoice_id).await?;
        if invoice.status == "CONFIRMED" {
            return Err(ServiceError::Conflict(format!(
                "Invoice {} is already confirmed",
                invoice.invoice_no
            )));
        }

        let now = Utc::now();
        let mut active: invoices::ActiveModel = invoice.into();
        active.status = Set("CONFIRMED".to_string());
        active.confirmed_at = Set(Some(now));
        active.confirmed_by = Set(confirmed_by);
        active.updated_at = Set(now);
        let invoice = active.update(&*self.db).await?;

        info!(invoice_id = invoice.invoice_id, "invoice confirmed");
        self.event_sender
            .send(Event::InvoiceConfirmed {
                invoice_id: invoice.invoice_id,
                confirmed_by: invoice.confirmed_by.clone().unwrap_or_default(),
            })
            .await;

        Ok(invoice)
    }

    /// Edit a line on an unconfirmed invoice. A CONFIRMED header rejects the
    /// edit with a 409 pointing the caller at the revision mechanism.
    #[instrument(skip(self, patch))]
    pub async fn update_line(
        &self,
        invoice_id: i64,
        line_no: i32,
        patch: InvoiceLinePatch,
    ) -> Result<invoice_lines::Model, ServiceError> {
        let invoice = self.find_invoice(&*self.db, invoice_id).await?;
        if invoice.status == "CONFIRMED" {
            return Err(ServiceError::Conflict(format!(
                "Invoice {} is confirmed and immutable; create a revision instead",
                invoice.invoice_no
            )));
        }

        let line = invoice_lines::Entity::find()
            .filter(invoice_lines::Column::InvoiceId.eq(invoice_id))
            .filter(invoice_lines::Column::LineNo.eq(line_no))
            .filter(invoice_lines::Column::IsDeleted.eq(false))
            .one(&*self.db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!(
                    "Line {} not found on invoice {}",
                    line_no, invoice_id
                ))
            })?;

        if let Some(qty) = patch.qty {
            if qty <= 0 {
                return Err(ServiceError::ValidationError(
                    "qty must be positive".to_string(),
                ));
            }
        }

        let qty = patch.qty.unwrap_or(line.qty);
        let unit_price = patch.unit_price.unwrap_or(line.unit_price);

        let mut active: invoice_lines::ActiveModel = line.into();
        if let Some(description) = patch.description {
            active.description = Set(Some(description));
        }
        active.qty = Set(qty);
        active.unit_price = Set(unit_price);
        active.amount = Set(unit_price * Decimal::from(qty));
        active.updated_at = Set(Utc::now());
        let line = active.update(&*self.db).await?;

        Ok(line)
    }

    async fn find_invoice<C: ConnectionTrait>(
        &self,
        conn: &C,
        invoice_id: i64,
    ) -> Result<invoices::Model, ServiceError> {
        invoices::Entity::find_by_id(invoice_id)
            .filter(invoices::Column::IsDeleted.eq(false))
            .one(conn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Invoice {} not found", invoice_id)))
    }

    async fn load_lines<C: ConnectionTrait>(
        &self,
        conn: &C,
        invoice_id: i64,
    ) -> Result<Vec<invoice_lines::Model>, ServiceError> {
        Ok(invoice_lines::Entity::find()
            .filter(invoice_lines::Column::InvoiceId.eq(invoice_id))
            .filter(invoice_lines::Column::IsDeleted.eq(false))
            .order_by_asc(invoice_lines::Column::LineNo)
            .all(conn)
            .await?)
    }

    async fn chain_for_root<C: ConnectionTrait>(
        &self,
        conn: &C,
        root_id: i64,
    ) -> Result<Vec<invoices::Model>, ServiceError> {
        Ok(invoices::Entity::find()
            .filter(
                Condition::any()
                    .add(invoices::Column::InvoiceId.eq(root_id))
                    .add(invoices::Column::RevisionOfInvoiceId.eq(root_id)),
            )
            .filter(invoices::Column::IsDeleted.eq(false))
            .order_by_asc(invoices::Column::RevisionNo)
            .all(conn)
            .await?)
    }

    async fn generate_invoice_number<C: ConnectionTrait>(
        &self,
        conn: &C,
        buyer_code: &str,
        yy: u32,
    ) -> Result<String, ServiceError> {
        let prefix = format!("JMI-{}-{:02}-", buyer_code, yy % 100);
        let existing: Vec<String> = invoices::Entity::find()
            .filter(invoices::Column::InvoiceNo.starts_with(&prefix))
            .all(conn)
            .await?
            .into_iter()
            .map(|i| i.invoice_no)
            .collect();
        Ok(next_invoice_number(buyer_code, yy, &existing))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_number_for_a_buyer_year_starts_at_one() {
        assert_eq!(next_invoice_number("ACME", 2026, &[]), "JMI-ACME-26-0001");
    }

    #[test]
    fn sequence_continues_from_highest_existing() {
        let existing = vec![
            "JMI-ACME-26-0001".to_string(),
            "JMI-ACME-26-0007".to_string(),
            "JMI-ACME-26-0003".to_string(),
        ];
        assert_eq!(
            next_invoice_number("ACME", 2026, &existing),
            "JMI-ACME-26-0008"
        );
    }

    #[test]
    fn other_buyers_and_years_do_not_interfere() {
        let existing = vec![
            "JMI-ACME-25-0042".to_string(),
            "JMI-OTHER-26-0099".to_string(),
            "JMI-ACME-26-garbage".to_string(),
        ];
        assert_eq!(
            next_invoice_number("ACME", 2026, &existing),
            "JMI-ACME-26-0001"
        );
    }
}
