use axum::{
    extract::{Path, Query, State},
    response::Response,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::errors::ApiError;
use crate::handlers::common::{
    map_service_error, no_content_response, success_response, validate_input,
};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ResolveQuery {
    pub user_id: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ResolvedPermissionsResponse {
    pub user_id: i64,
    pub role: String,
    pub permissions: Vec<String>,
    /// Which source decided each key: role-default, override, legacy-grant
    /// or legacy-revoke.
    pub sources: std::collections::BTreeMap<String, String>,
    pub breakdown: PermissionBreakdownResponse,
}

/// The raw per-source lists behind a resolution, for audit/UI display.
#[derive(Debug, Serialize, ToSchema)]
pub struct PermissionBreakdownResponse {
    /// Role-default keys actually used (table rows or static fallback).
    pub base: Vec<String>,
    pub override_grants: Vec<String>,
    pub override_denies: Vec<String>,
    pub legacy_grants: Vec<String>,
    pub legacy_revokes: Vec<String>,
}

impl From<crate::services::permissions::PermissionBreakdown> for PermissionBreakdownResponse {
    fn from(b: crate::services::permissions::PermissionBreakdown) -> Self {
        Self {
            base: b.base.into_iter().collect(),
            override_grants: b.override_grants.into_iter().collect(),
            override_denies: b.override_denies.into_iter().collect(),
            legacy_grants: b.legacy_grants.into_iter().collect(),
            legacy_revokes: b.legacy_revokes.into_iter().collect(),
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/permissions",
    summary = "Resolve permissions",
    description = "The effective permission set for a user after merging role defaults, overrides and legacy grant/revoke rows",
    params(("user_id" = i64, Query, description = "User to resolve")),
    responses(
        (status = 200, description = "Effective permissions", body = ResolvedPermissionsResponse),
        (status = 404, description = "User not found", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = []))
)]
pub async fn resolve_permissions(
    State(state): State<AppState>,
    Query(query): Query<ResolveQuery>,
) -> Result<Response, ApiError> {
    let resolved = state
        .services
        .permissions
        .resolve_for_user(query.user_id)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(ResolvedPermissionsResponse {
        user_id: resolved.user_id,
        role: resolved.role,
        permissions: resolved.permissions.into_iter().collect(),
        sources: resolved.sources,
        breakdown: resolved.breakdown.into(),
    }))
}

/// Unknown permission keys are accepted as-is; the vocabulary is open at
/// write time.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SetOverrideRequest {
    #[validate(length(min = 1, message = "perm_key is required"))]
    pub perm_key: String,
    pub allowed: bool,
}

#[utoipa::path(
    put,
    path = "/api/v1/permissions/overrides/{user_id}",
    summary = "Set permission override",
    description = "Create or update a per-user permission override",
    params(("user_id" = i64, Path, description = "User to override")),
    request_body = SetOverrideRequest,
    responses(
        (status = 200, description = "Override stored"),
        (status = 404, description = "User not found", body = crate::errors::ErrorResponse),
        (status = 403, description = "Forbidden", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = []))
)]
pub async fn set_override(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Json(request): Json<SetOverrideRequest>,
) -> Result<Response, ApiError> {
    validate_input(&request)?;
    let model = state
        .services
        .permissions
        .set_override(user_id, &request.perm_key, request.allowed)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(model))
}

#[utoipa::path(
    delete,
    path = "/api/v1/permissions/overrides/{user_id}/{perm_key}",
    summary = "Clear permission override",
    description = "Remove a per-user override so the role default applies again",
    params(
        ("user_id" = i64, Path, description = "User"),
        ("perm_key" = String, Path, description = "Permission key"),
    ),
    responses(
        (status = 204, description = "Override removed"),
        (status = 404, description = "No such override", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = []))
)]
pub async fn clear_override(
    State(state): State<AppState>,
    Path((user_id, perm_key)): Path<(i64, String)>,
) -> Result<Response, ApiError> {
    state
        .services
        .permissions
        .clear_override(user_id, &perm_key)
        .await
        .map_err(map_service_error)?;
    Ok(no_content_response())
}
