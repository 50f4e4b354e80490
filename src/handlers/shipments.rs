use axum::{
    extract::{Path, State},
    response::Response,
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::entities::{shipment_lines, shipments};
use crate::errors::ApiError;
use crate::handlers::common::{created_response, map_service_error, success_response, validate_input};
use crate::services::orders::{NewShipment, NewShipmentLine};
use crate::AppState;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ShipmentLineRequest {
    pub po_line_id: i64,
    pub shipped_qty: i32,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateShipmentRequest {
    #[validate(length(min = 1, message = "shipment_no is required"))]
    pub shipment_no: String,
    pub shipped_date: Option<NaiveDate>,
    #[validate(length(min = 1, message = "at least one line is required"))]
    pub lines: Vec<ShipmentLineRequest>,
}

#[derive(Debug, Serialize)]
pub struct ShipmentResponse {
    #[serde(flatten)]
    pub shipment: shipments::Model,
    pub lines: Vec<shipment_lines::Model>,
}

#[utoipa::path(
    post,
    path = "/api/v1/shipments",
    summary = "Create shipment",
    description = "Record shipped quantities against PO lines; affected headers get their status recomputed",
    request_body = CreateShipmentRequest,
    responses(
        (status = 201, description = "Shipment created"),
        (status = 404, description = "PO line not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Shipped quantity exceeds remaining", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = []))
)]
pub async fn create_shipment(
    State(state): State<AppState>,
    Json(request): Json<CreateShipmentRequest>,
) -> Result<Response, ApiError> {
    validate_input(&request)?;

    let input = NewShipment {
        shipment_no: request.shipment_no,
        shipped_date: request.shipped_date,
        lines: request
            .lines
            .into_iter()
            .map(|l| NewShipmentLine {
                po_line_id: l.po_line_id,
                shipped_qty: l.shipped_qty,
            })
            .collect(),
    };

    let shipment = state
        .services
        .orders
        .create_shipment(input)
        .await
        .map_err(map_service_error)?;
    Ok(created_response(shipment))
}

#[utoipa::path(
    get,
    path = "/api/v1/shipments/{id}",
    summary = "Get shipment",
    params(("id" = i64, Path, description = "Shipment id")),
    responses(
        (status = 200, description = "Shipment with lines"),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = []))
)]
pub async fn get_shipment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Response, ApiError> {
    let (shipment, lines) = state
        .services
        .orders
        .get_shipment(id)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(ShipmentResponse { shipment, lines }))
}
