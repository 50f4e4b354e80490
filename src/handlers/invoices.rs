use axum::{
    extract::{Path, State},
    response::Response,
    Json,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::auth::AuthUser;
use crate::errors::ApiError;
use crate::handlers::common::{created_response, map_service_error, success_response, validate_input};
use crate::services::invoicing::{InvoiceLinePatch, NewInvoice, NewInvoiceLine};
use crate::AppState;

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateInvoiceLineRequest {
    #[validate(range(min = 1, message = "line_no must be positive"))]
    pub line_no: i32,
    pub description: Option<String>,
    #[validate(range(min = 1, message = "qty must be positive"))]
    pub qty: i32,
    pub unit_price: Decimal,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateInvoiceRequest {
    #[validate(length(min = 1, message = "buyer_code is required"))]
    pub buyer_code: String,
    pub currency: Option<String>,
    pub incoterm: Option<String>,
    pub consignee: Option<String>,
    pub remarks: Option<String>,
    #[validate(length(min = 1, message = "at least one line is required"))]
    pub lines: Vec<CreateInvoiceLineRequest>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateInvoiceLineRequest {
    pub description: Option<String>,
    pub qty: Option<i32>,
    pub unit_price: Option<Decimal>,
}

#[utoipa::path(
    post,
    path = "/api/v1/invoices",
    summary = "Create invoice",
    description = "A new root invoice (revision 1) with a generated invoice number",
    request_body = CreateInvoiceRequest,
    responses(
        (status = 201, description = "Invoice created"),
        (status = 400, description = "Invalid request data", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = []))
)]
pub async fn create_invoice(
    State(state): State<AppState>,
    Json(request): Json<CreateInvoiceRequest>,
) -> Result<Response, ApiError> {
    validate_input(&request)?;

    let input = NewInvoice {
        buyer_code: request.buyer_code,
        currency: request.currency,
        incoterm: request.incoterm,
        consignee: request.consignee,
        remarks: request.remarks,
        lines: request
            .lines
            .into_iter()
            .map(|l| NewInvoiceLine {
                line_no: l.line_no,
                description: l.description,
                qty: l.qty,
                unit_price: l.unit_price,
            })
            .collect(),
    };

    let invoice = state
        .services
        .invoicing
        .create_invoice(input)
        .await
        .map_err(map_service_error)?;
    Ok(created_response(invoice))
}

#[utoipa::path(
    get,
    path = "/api/v1/invoices/{id}",
    summary = "Get invoice",
    params(("id" = i64, Path, description = "Invoice id")),
    responses(
        (status = 200, description = "Invoice with lines"),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = []))
)]
pub async fn get_invoice(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Response, ApiError> {
    let invoice = state
        .services
        .invoicing
        .get_invoice(id)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(invoice))
}

#[utoipa::path(
    get,
    path = "/api/v1/invoices/{id}/revisions",
    summary = "List revision chain",
    description = "Every header in the invoice's revision chain, oldest first",
    params(("id" = i64, Path, description = "Any invoice id in the chain")),
    responses(
        (status = 200, description = "Revision chain"),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = []))
)]
pub async fn list_revisions(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Response, ApiError> {
    let chain = state
        .services
        .invoicing
        .revision_chain(id)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(chain))
}

#[utoipa::path(
    post,
    path = "/api/v1/invoices/{id}/revision",
    summary = "Create revision",
    description = "A fresh DRAFT header with the next revision number and copied lines; becomes the chain's latest",
    params(("id" = i64, Path, description = "Invoice to revise")),
    responses(
        (status = 201, description = "Revision created"),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = []))
)]
pub async fn create_revision(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Response, ApiError> {
    let outcome = state
        .services
        .invoicing
        .create_revision(id)
        .await
        .map_err(map_service_error)?;
    Ok(created_response(outcome))
}

#[utoipa::path(
    post,
    path = "/api/v1/invoices/{id}/confirm",
    summary = "Confirm invoice",
    description = "Locks the invoice's lines; further edits must go through a new revision",
    params(("id" = i64, Path, description = "Invoice id")),
    responses(
        (status = 200, description = "Invoice confirmed"),
        (status = 409, description = "Already confirmed", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = []))
)]
pub async fn confirm_invoice(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<i64>,
) -> Result<Response, ApiError> {
    let invoice = state
        .services
        .invoicing
        .confirm_invoice(id, Some(auth_user.username))
        .await
        .map_err(map_service_error)?;
    Ok(success_response(invoice))
}

#[utoipa::path(
    put,
    path = "/api/v1/invoices/{id}/lines/{line_no}",
    summary = "Update invoice line",
    description = "Edit a line on an unconfirmed invoice; the amount is recomputed from qty and unit price",
    params(
        ("id" = i64, Path, description = "Invoice id"),
        ("line_no" = i32, Path, description = "Line number"),
    ),
    request_body = UpdateInvoiceLineRequest,
    responses(
        (status = 200, description = "Line updated"),
        (status = 404, description = "Invoice or line not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Invoice is confirmed", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = []))
)]
pub async fn update_line(
    State(state): State<AppState>,
    Path((id, line_no)): Path<(i64, i32)>,
    Json(request): Json<UpdateInvoiceLineRequest>,
) -> Result<Response, ApiError> {
    let patch = InvoiceLinePatch {
        description: request.description,
        qty: request.qty,
        unit_price: request.unit_price,
    };
    let line = state
        .services
        .invoicing
        .update_line(id, line_no, patch)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(line))
}
