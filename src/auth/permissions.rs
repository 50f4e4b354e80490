/*!
 * # Permission vocabulary
 *
 * Permission keys form a fixed closed vocabulary of `{resource}.{action}`
 * strings. Route gating uses the constants below; write endpoints accept
 * unknown keys without validating against the vocabulary (observed legacy
 * behavior, kept).
 */

use lazy_static::lazy_static;
use std::collections::HashMap;

/// Permission string constants for compile-time safety
pub mod consts {
    pub const PO_VIEW: &str = "po.view";
    pub const PO_EDIT: &str = "po.edit";
    pub const PO_CANCEL: &str = "po.cancel";

    pub const SHIPMENT_VIEW: &str = "shipment.view";
    pub const SHIPMENT_CREATE: &str = "shipment.create";

    pub const INVOICE_VIEW: &str = "invoice.view";
    pub const INVOICE_CREATE: &str = "invoice.create";
    pub const INVOICE_EDIT: &str = "invoice.edit";
    pub const INVOICE_CONFIRM: &str = "invoice.confirm";
    pub const INVOICE_REVISE: &str = "invoice.revise";

    pub const PACKING_VIEW: &str = "packing.view";
    pub const PACKING_EDIT: &str = "packing.edit";

    pub const IMAGE_UPLOAD: &str = "image.upload";

    pub const PERMISSION_VIEW: &str = "permission.view";
    pub const PERMISSION_MANAGE: &str = "permission.manage";
    pub const USER_MANAGE: &str = "user.manage";
}

use consts::*;

/// Every key in the vocabulary, in display order.
pub const ALL_PERMISSIONS: &[&str] = &[
    PO_VIEW,
    PO_EDIT,
    PO_CANCEL,
    SHIPMENT_VIEW,
    SHIPMENT_CREATE,
    INVOICE_VIEW,
    INVOICE_CREATE,
    INVOICE_EDIT,
    INVOICE_CONFIRM,
    INVOICE_REVISE,
    PACKING_VIEW,
    PACKING_EDIT,
    IMAGE_UPLOAD,
    PERMISSION_VIEW,
    PERMISSION_MANAGE,
    USER_MANAGE,
];

/// Role fallback when the role is unknown to the static table.
pub const FALLBACK_ROLE: &str = "viewer";

lazy_static! {
    /// Static role defaults. Used when the `role_permissions` table carries
    /// no rows for a role; an unknown role falls back to `viewer`.
    pub static ref DEFAULT_ROLE_PERMISSIONS: HashMap<&'static str, Vec<&'static str>> = {
        let mut roles = HashMap::new();

        roles.insert("admin", ALL_PERMISSIONS.to_vec());

        roles.insert(
            "manager",
            vec![
                PO_VIEW,
                PO_EDIT,
                PO_CANCEL,
                SHIPMENT_VIEW,
                SHIPMENT_CREATE,
                INVOICE_VIEW,
                INVOICE_CREATE,
                INVOICE_EDIT,
                INVOICE_CONFIRM,
                INVOICE_REVISE,
                PACKING_VIEW,
                PACKING_EDIT,
                IMAGE_UPLOAD,
                PERMISSION_VIEW,
            ],
        );

        roles.insert(
            "staff",
            vec![
                PO_VIEW,
                PO_EDIT,
                SHIPMENT_VIEW,
                SHIPMENT_CREATE,
                INVOICE_VIEW,
                INVOICE_CREATE,
                INVOICE_EDIT,
                PACKING_VIEW,
                PACKING_EDIT,
                IMAGE_UPLOAD,
            ],
        );

        roles.insert(
            "viewer",
            vec![PO_VIEW, SHIPMENT_VIEW, INVOICE_VIEW, PACKING_VIEW],
        );

        roles
    };
}

/// Static default list for a role; unknown roles get `viewer`'s list.
pub fn static_defaults_for_role(role: &str) -> &'static [&'static str] {
    DEFAULT_ROLE_PERMISSIONS
        .get(role)
        .or_else(|| DEFAULT_ROLE_PERMISSIONS.get(FALLBACK_ROLE))
        .map(|v| v.as_slice())
        .unwrap_or(&[])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_defaults_cover_whole_vocabulary() {
        assert_eq!(static_defaults_for_role("admin"), ALL_PERMISSIONS);
    }

    #[test]
    fn unknown_role_falls_back_to_viewer() {
        assert_eq!(
            static_defaults_for_role("intern"),
            static_defaults_for_role("viewer")
        );
    }

    #[test]
    fn viewer_has_no_write_permissions() {
        let viewer = static_defaults_for_role("viewer");
        assert!(viewer.iter().all(|p| p.ends_with(".view")));
    }
}
