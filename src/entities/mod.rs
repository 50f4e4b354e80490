pub mod users;

// Permission sources
pub mod permission_grants;
pub mod permission_revokes;
pub mod role_permissions;
pub mod user_permission_overrides;

// Trade documents
pub mod invoice_lines;
pub mod invoices;
pub mod packing_list_lines;
pub mod packing_lists;
pub mod purchase_order_headers;
pub mod purchase_order_lines;
pub mod shipment_lines;
pub mod shipments;
pub mod styles;
