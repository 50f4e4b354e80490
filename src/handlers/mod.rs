use std::sync::Arc;

use crate::auth::AuthService;
use crate::services::images::ImageService;
use crate::services::invoicing::InvoicingService;
use crate::services::orders::OrderService;
use crate::services::packing::PackingService;
use crate::services::permissions::PermissionResolver;

pub mod auth;
pub mod common;
pub mod images;
pub mod invoices;
pub mod packing_lists;
pub mod permissions;
pub mod purchase_orders;
pub mod shipments;

/// Shared service container for the handler layer.
#[derive(Clone)]
pub struct AppServices {
    pub auth: Arc<AuthService>,
    pub permissions: Arc<PermissionResolver>,
    pub orders: Arc<OrderService>,
    pub invoicing: Arc<InvoicingService>,
    pub packing: Arc<PackingService>,
    pub images: Arc<ImageService>,
}
