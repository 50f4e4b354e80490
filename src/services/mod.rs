pub mod images;
pub mod invoicing;
pub mod orders;
pub mod packing;
pub mod permissions;
