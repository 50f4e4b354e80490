use axum::{extract::State, response::Response, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::auth::{AuthError, AuthUser};
use crate::errors::{ApiError, ServiceError};
use crate::handlers::common::{success_response, validate_input};
use crate::AppState;

fn map_auth_error(err: AuthError) -> ApiError {
    match err {
        AuthError::InternalError(msg) => ApiError::ServiceError(ServiceError::InternalError(msg)),
        AuthError::InsufficientPermissions => {
            ApiError::ServiceError(ServiceError::Forbidden(err.to_string()))
        }
        other => ApiError::ServiceError(ServiceError::AuthError(other.to_string())),
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MeResponse {
    pub user_id: i64,
    pub username: String,
    pub role: String,
    pub permissions: Vec<String>,
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    summary = "Log in",
    description = "Verify credentials and issue a bearer token carrying the user's resolved permissions",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token issued"),
        (status = 400, description = "Missing credentials", body = crate::errors::ErrorResponse),
        (status = 401, description = "Invalid credentials or inactive account", body = crate::errors::ErrorResponse),
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Response, ApiError> {
    validate_input(&request)?;
    let token = state
        .services
        .auth
        .login(&request.username, &request.password)
        .await
        .map_err(map_auth_error)?;
    Ok(success_response(token))
}

#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    summary = "Current user",
    description = "The authenticated user's identity and effective permissions as of token issue",
    responses(
        (status = 200, description = "Current user", body = MeResponse),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = []))
)]
pub async fn me(auth_user: AuthUser) -> Response {
    success_response(MeResponse {
        user_id: auth_user.user_id,
        username: auth_user.username,
        role: auth_user.role,
        permissions: auth_user.permissions,
    })
}
