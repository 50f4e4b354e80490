//! Tradedesk API Library
//!
//! Trade-document backend: purchase orders with shipment tracking and line
//! cancellation, invoices with a revision chain, packing lists with line
//! splitting, style image attachments, and permission-gated access.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod auth;
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod events;
pub mod handlers;
pub mod migrator;
pub mod openapi;
pub mod services;

use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{delete, get, post, put},
    Router,
};
use sea_orm::DatabaseConnection;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::auth::consts as perm;
use crate::auth::{AuthRouterExt, AuthService};

/// Shared application state for the HTTP layer.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub event_sender: events::EventSender,
    pub services: handlers::AppServices,
}

/// Liveness probe with a database ping.
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    match state.db.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({"status": "ok", "database": "ok"})),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({"status": "degraded", "database": e.to_string()})),
        ),
    }
}

/// The `/api/v1` route tree, grouped by required permission.
pub fn api_v1_routes() -> Router<AppState> {
    let auth_routes = Router::new()
        .route("/auth/login", post(handlers::auth::login))
        .merge(
            Router::new()
                .route("/auth/me", get(handlers::auth::me))
                .with_auth(),
        );

    let permissions_read = Router::new()
        .route("/permissions", get(handlers::permissions::resolve_permissions))
        .with_permission(perm::PERMISSION_VIEW);

    let permissions_manage = Router::new()
        .route(
            "/permissions/overrides/:user_id",
            put(handlers::permissions::set_override),
        )
        .route(
            "/permissions/overrides/:user_id/:perm_key",
            delete(handlers::permissions::clear_override),
        )
        .with_permission(perm::PERMISSION_MANAGE);

    let orders_read = Router::new()
        .route(
            "/purchase-orders",
            get(handlers::purchase_orders::list_purchase_orders),
        )
        .route(
            "/purchase-orders/:po_number",
            get(handlers::purchase_orders::get_purchase_order),
        )
        .with_permission(perm::PO_VIEW);

    let orders_create = Router::new()
        .route(
            "/purchase-orders",
            post(handlers::purchase_orders::create_purchase_order),
        )
        .with_permission(perm::PO_EDIT);

    let orders_cancel = Router::new()
        .route(
            "/purchase-orders/:po_number/cancel-lines",
            put(handlers::purchase_orders::cancel_lines),
        )
        .with_permission(perm::PO_CANCEL);

    let shipments_read = Router::new()
        .route("/shipments/:id", get(handlers::shipments::get_shipment))
        .with_permission(perm::SHIPMENT_VIEW);

    let shipments_create = Router::new()
        .route("/shipments", post(handlers::shipments::create_shipment))
        .with_permission(perm::SHIPMENT_CREATE);

    let invoices_read = Router::new()
        .route("/invoices/:id", get(handlers::invoices::get_invoice))
        .route(
            "/invoices/:id/revisions",
            get(handlers::invoices::list_revisions),
        )
        .with_permission(perm::INVOICE_VIEW);

    let invoices_create = Router::new()
        .route("/invoices", post(handlers::invoices::create_invoice))
        .with_permission(perm::INVOICE_CREATE);

    let invoices_edit = Router::new()
        .route(
            "/invoices/:id/lines/:line_no",
            put(handlers::invoices::update_line),
        )
        .with_permission(perm::INVOICE_EDIT);

    let invoices_revise = Router::new()
        .route(
            "/invoices/:id/revision",
            post(handlers::invoices::create_revision),
        )
        .with_permission(perm::INVOICE_REVISE);

    let invoices_confirm = Router::new()
        .route(
            "/invoices/:id/confirm",
            post(handlers::invoices::confirm_invoice),
        )
        .with_permission(perm::INVOICE_CONFIRM);

    let packing_read = Router::new()
        .route(
            "/packing-lists/:id",
            get(handlers::packing_lists::get_packing_list),
        )
        .with_permission(perm::PACKING_VIEW);

    let packing_edit = Router::new()
        .route(
            "/packing-lists",
            post(handlers::packing_lists::create_packing_list),
        )
        .route(
            "/packing-lists/:id/split-line",
            post(handlers::packing_lists::split_line),
        )
        .with_permission(perm::PACKING_EDIT);

    let images_upload = Router::new()
        .route("/images", post(handlers::images::upload_image))
        .with_permission(perm::IMAGE_UPLOAD);

    Router::new()
        .merge(auth_routes)
        .merge(permissions_read)
        .merge(permissions_manage)
        .merge(orders_read)
        .merge(orders_create)
        .merge(orders_cancel)
        .merge(shipments_read)
        .merge(shipments_create)
        .merge(invoices_read)
        .merge(invoices_create)
        .merge(invoices_edit)
        .merge(invoices_revise)
        .merge(invoices_confirm)
        .merge(packing_read)
        .merge(packing_edit)
        .merge(images_upload)
}

/// Assemble the full application router: health, the v1 API, Swagger UI and
/// the middleware stack. Used by both the binary and the test harness.
pub fn build_router(state: AppState, auth_service: Arc<AuthService>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_v1_routes())
        .merge(openapi::swagger_ui())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(axum::middleware::from_fn_with_state(
            auth_service,
            |axum::extract::State(auth): axum::extract::State<Arc<AuthService>>,
             mut req: axum::extract::Request,
             next: axum::middleware::Next| async move {
                req.extensions_mut().insert(auth);
                next.run(req).await
            },
        ))
        .with_state(state)
}
