use axum::{
    extract::{Path, Query, State},
    response::Response,
    Json,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::errors::ApiError;
use crate::handlers::common::{
    created_response, map_service_error, success_response, validate_input, PaginatedResponse,
    PaginationParams,
};
use crate::services::orders::{
    CancelContext, LineCancellation, NewOrderLine, NewPurchaseOrder,
};
use crate::AppState;

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateOrderLineRequest {
    #[validate(range(min = 1, message = "line_no must be positive"))]
    pub line_no: i32,
    pub style_id: Option<i64>,
    pub description: Option<String>,
    #[validate(range(min = 1, message = "ordered_qty must be positive"))]
    pub ordered_qty: i32,
    pub unit_price: Option<Decimal>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreatePurchaseOrderRequest {
    #[validate(length(min = 1, message = "po_number is required"))]
    pub po_number: String,
    #[validate(length(min = 1, message = "buyer_code is required"))]
    pub buyer_code: String,
    #[validate(length(min = 1, message = "at least one line is required"))]
    pub lines: Vec<CreateOrderLineRequest>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CancelLineRequest {
    pub po_line_id: i64,
    pub qty_cancelled: i32,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CancelLinesRequest {
    #[validate(length(min = 1, message = "at least one line is required"))]
    pub lines: Vec<CancelLineRequest>,
    pub cancel_reason: Option<String>,
    pub cancel_note: Option<String>,
    pub cancel_date: Option<NaiveDate>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CancelLinesResponse {
    pub po_no: String,
    pub po_header_id: i64,
    pub status: String,
}

#[utoipa::path(
    post,
    path = "/api/v1/purchase-orders",
    summary = "Create purchase order",
    request_body = CreatePurchaseOrderRequest,
    responses(
        (status = 201, description = "Purchase order created"),
        (status = 400, description = "Invalid request data", body = crate::errors::ErrorResponse),
        (status = 409, description = "Duplicate PO number", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = []))
)]
pub async fn create_purchase_order(
    State(state): State<AppState>,
    Json(request): Json<CreatePurchaseOrderRequest>,
) -> Result<Response, ApiError> {
    validate_input(&request)?;

    let input = NewPurchaseOrder {
        po_number: request.po_number,
        buyer_code: request.buyer_code,
        lines: request
            .lines
            .into_iter()
            .map(|l| NewOrderLine {
                line_no: l.line_no,
                style_id: l.style_id,
                description: l.description,
                ordered_qty: l.ordered_qty,
                unit_price: l.unit_price,
            })
            .collect(),
    };

    let order = state
        .services
        .orders
        .create_purchase_order(input)
        .await
        .map_err(map_service_error)?;
    Ok(created_response(order))
}

#[utoipa::path(
    get,
    path = "/api/v1/purchase-orders",
    summary = "List purchase orders",
    params(PaginationParams),
    responses(
        (status = 200, description = "Purchase orders"),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = []))
)]
pub async fn list_purchase_orders(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> Result<Response, ApiError> {
    let (page, per_page) = params.clamped();
    let (headers, total) = state
        .services
        .orders
        .list_purchase_orders(page, per_page)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(PaginatedResponse::new(
        headers, page, per_page, total,
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/purchase-orders/{po_number}",
    summary = "Get purchase order",
    description = "The header with all lines, each carrying derived shipped and remaining quantities",
    params(("po_number" = String, Path, description = "PO number")),
    responses(
        (status = 200, description = "Purchase order"),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = []))
)]
pub async fn get_purchase_order(
    State(state): State<AppState>,
    Path(po_number): Path<String>,
) -> Result<Response, ApiError> {
    let order = state
        .services
        .orders
        .get_purchase_order(&po_number)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(order))
}

#[utoipa::path(
    put,
    path = "/api/v1/purchase-orders/{po_number}/cancel-lines",
    summary = "Cancel order lines",
    description = "Apply a batch of line cancellations atomically and recompute the header status. An over-cancel rejects the whole batch with a 409 carrying the quantity breakdown.",
    params(("po_number" = String, Path, description = "PO number")),
    request_body = CancelLinesRequest,
    responses(
        (status = 200, description = "Lines cancelled", body = CancelLinesResponse),
        (status = 404, description = "PO or line not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Cancel quantity exceeds maximum", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = []))
)]
pub async fn cancel_lines(
    State(state): State<AppState>,
    Path(po_number): Path<String>,
    Json(request): Json<CancelLinesRequest>,
) -> Result<Response, ApiError> {
    validate_input(&request)?;

    let batch = request
        .lines
        .into_iter()
        .map(|l| LineCancellation {
            po_line_id: l.po_line_id,
            qty_cancelled: l.qty_cancelled,
        })
        .collect();
    let ctx = CancelContext {
        cancel_reason: request.cancel_reason,
        cancel_note: request.cancel_note,
        cancel_date: request.cancel_date,
    };

    let order = state
        .services
        .orders
        .cancel_lines(&po_number, batch, ctx)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(CancelLinesResponse {
        po_no: order.header.po_number.clone(),
        po_header_id: order.header.po_header_id,
        status: order.header.status.clone(),
    }))
}
