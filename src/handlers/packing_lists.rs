use axum::{
    extract::{Path, State},
    response::Response,
    Json,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::errors::ApiError;
use crate::handlers::common::{created_response, map_service_error, success_response, validate_input};
use crate::services::packing::{NewPackingLine, NewPackingList, SplitRequest};
use crate::AppState;

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct PackingLineRequest {
    #[validate(range(min = 1, message = "line_no must be positive"))]
    pub line_no: i32,
    pub description: Option<String>,
    #[validate(range(min = 1, message = "cartons must be positive"))]
    pub cartons: i32,
    #[validate(range(min = 1, message = "shipped_qty must be positive"))]
    pub shipped_qty: i32,
    pub gw_per_ctn: Decimal,
    pub nw_per_ctn: Decimal,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreatePackingListRequest {
    #[validate(length(min = 1, message = "packing_list_no is required"))]
    pub packing_list_no: String,
    pub invoice_id: Option<i64>,
    #[validate(length(min = 1, message = "at least one line is required"))]
    pub lines: Vec<PackingLineRequest>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SplitLineRequest {
    pub line_id: i64,
    pub split_cartons: i32,
    pub split_qty: i32,
    pub split_gw_per_ctn: Option<Decimal>,
    pub split_nw_per_ctn: Option<Decimal>,
    pub split_description_suffix: Option<String>,
}

#[utoipa::path(
    post,
    path = "/api/v1/packing-lists",
    summary = "Create packing list",
    request_body = CreatePackingListRequest,
    responses(
        (status = 201, description = "Packing list created"),
        (status = 409, description = "Duplicate packing list number", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = []))
)]
pub async fn create_packing_list(
    State(state): State<AppState>,
    Json(request): Json<CreatePackingListRequest>,
) -> Result<Response, ApiError> {
    validate_input(&request)?;

    let input = NewPackingList {
        packing_list_no: request.packing_list_no,
        invoice_id: request.invoice_id,
        lines: request
            .lines
            .into_iter()
            .map(|l| NewPackingLine {
                line_no: l.line_no,
                description: l.description,
                cartons: l.cartons,
                shipped_qty: l.shipped_qty,
                gw_per_ctn: l.gw_per_ctn,
                nw_per_ctn: l.nw_per_ctn,
            })
            .collect(),
    };

    let list = state
        .services
        .packing
        .create_packing_list(input)
        .await
        .map_err(map_service_error)?;
    Ok(created_response(list))
}

#[utoipa::path(
    get,
    path = "/api/v1/packing-lists/{id}",
    summary = "Get packing list",
    params(("id" = i64, Path, description = "Packing list id")),
    responses(
        (status = 200, description = "Packing list with lines"),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = []))
)]
pub async fn get_packing_list(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Response, ApiError> {
    let list = state
        .services
        .packing
        .get_packing_list(id)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(list))
}

#[utoipa::path(
    post,
    path = "/api/v1/packing-lists/{id}/split-line",
    summary = "Split packing line",
    description = "Move part of a line's cartons and quantity onto a new line; weights are recomputed for both",
    params(("id" = i64, Path, description = "Packing list id")),
    request_body = SplitLineRequest,
    responses(
        (status = 200, description = "Line split"),
        (status = 400, description = "split_cartons and split_qty must be positive", body = crate::errors::ErrorResponse),
        (status = 404, description = "List or line not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Split must leave something on the original line", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = []))
)]
pub async fn split_line(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<SplitLineRequest>,
) -> Result<Response, ApiError> {
    let outcome = state
        .services
        .packing
        .split_line(
            id,
            SplitRequest {
                line_id: request.line_id,
                split_cartons: request.split_cartons,
                split_qty: request.split_qty,
                split_gw_per_ctn: request.split_gw_per_ctn,
                split_nw_per_ctn: request.split_nw_per_ctn,
                split_description_suffix: request.split_description_suffix,
            },
        )
        .await
        .map_err(map_service_error)?;
    Ok(success_response(outcome))
}
