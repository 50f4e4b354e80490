use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Tradedesk API",
        version = "0.3.0",
        description = r#"
# Tradedesk Trade-Document API

Backend for managing purchase orders, shipments, invoices, packing lists
and style images in an apparel trading workflow.

## Authentication

All endpoints except `/auth/login` require a bearer token:

```
Authorization: Bearer <jwt>
```

Tokens embed the user's effective permission set, resolved at login from
role defaults, per-user overrides and legacy grant/revoke rows.

## Error Handling

Errors use a consistent JSON envelope with the matching HTTP status:

```json
{
  "error": "Conflict",
  "message": "Cannot cancel 50 of line 1: only 40 cancellable",
  "details": {"ordered": 100, "shipped": 60, "max_cancel": 40, "requested": 50},
  "timestamp": "2026-01-01T00:00:00Z"
}
```
        "#
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development")
    ),
    tags(
        (name = "Auth", description = "Login and identity"),
        (name = "Permissions", description = "Permission resolution and overrides"),
        (name = "Purchase Orders", description = "PO lifecycle and line cancellation"),
        (name = "Shipments", description = "Shipment recording"),
        (name = "Invoices", description = "Invoices and the revision chain"),
        (name = "Packing Lists", description = "Packing lists and line splitting"),
        (name = "Images", description = "Style image attachments")
    ),
    paths(
        crate::handlers::auth::login,
        crate::handlers::auth::me,
        crate::handlers::permissions::resolve_permissions,
        crate::handlers::permissions::set_override,
        crate::handlers::permissions::clear_override,
        crate::handlers::purchase_orders::create_purchase_order,
        crate::handlers::purchase_orders::list_purchase_orders,
        crate::handlers::purchase_orders::get_purchase_order,
        crate::handlers::purchase_orders::cancel_lines,
        crate::handlers::shipments::create_shipment,
        crate::handlers::shipments::get_shipment,
        crate::handlers::invoices::create_invoice,
        crate::handlers::invoices::get_invoice,
        crate::handlers::invoices::list_revisions,
        crate::handlers::invoices::create_revision,
        crate::handlers::invoices::confirm_invoice,
        crate::handlers::invoices::update_line,
        crate::handlers::packing_lists::create_packing_list,
        crate::handlers::packing_lists::get_packing_list,
        crate::handlers::packing_lists::split_line,
        crate::handlers::images::upload_image,
    ),
    components(
        schemas(
            crate::handlers::auth::LoginRequest,
            crate::handlers::auth::MeResponse,
            crate::handlers::permissions::ResolvedPermissionsResponse,
            crate::handlers::permissions::PermissionBreakdownResponse,
            crate::handlers::permissions::SetOverrideRequest,
            crate::handlers::purchase_orders::CreatePurchaseOrderRequest,
            crate::handlers::purchase_orders::CreateOrderLineRequest,
            crate::handlers::purchase_orders::CancelLinesRequest,
            crate::handlers::purchase_orders::CancelLineRequest,
            crate::handlers::purchase_orders::CancelLinesResponse,
            crate::handlers::shipments::CreateShipmentRequest,
            crate::handlers::shipments::ShipmentLineRequest,
            crate::handlers::invoices::CreateInvoiceRequest,
            crate::handlers::invoices::CreateInvoiceLineRequest,
            crate::handlers::invoices::UpdateInvoiceLineRequest,
            crate::handlers::packing_lists::CreatePackingListRequest,
            crate::handlers::packing_lists::PackingLineRequest,
            crate::handlers::packing_lists::SplitLineRequest,
            crate::handlers::images::UploadImageRequest,
            crate::errors::ErrorResponse
        )
    )
)]
pub struct ApiDocV1;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/docs")
        .url("/api-docs/openapi.json", ApiDocV1::openapi())
        .config(utoipa_swagger_ui::Config::from("/api-docs/openapi.json").try_it_out_enabled(true))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_document_includes_core_paths() {
        let openapi = ApiDocV1::openapi();
        let json = serde_json::to_string(&openapi).unwrap();
        assert!(json.contains("Tradedesk API"));
        assert!(json.contains("/api/v1/purchase-orders"));
        assert!(json.contains("/api/v1/invoices/{id}/revision"));
    }
}
