use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_users_table::Migration),
            Box::new(m20240101_000002_create_permission_tables::Migration),
            Box::new(m20240101_000003_create_styles_table::Migration),
            Box::new(m20240101_000004_create_purchase_order_tables::Migration),
            Box::new(m20240101_000005_create_invoice_tables::Migration),
            Box::new(m20240101_000006_create_packing_tables::Migration),
        ]
    }
}

// Migration implementations

mod m20240101_000001_create_users_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000001_create_users_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Users::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Users::Id)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(Users::Username)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                        .col(ColumnDef::new(Users::FullName).string().null())
                        .col(ColumnDef::new(Users::Role).string().not_null())
                        .col(
                            ColumnDef::new(Users::IsActive)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(
                            ColumnDef::new(Users::IsDeleted)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(Users::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Users::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Users::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Users {
        Table,
        Id,
        Username,
        PasswordHash,
        FullName,
        Role,
        IsActive,
        IsDeleted,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240101_000002_create_permission_tables {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000002_create_permission_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(RolePermissions::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(RolePermissions::Id)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(RolePermissions::Role).string().not_null())
                        .col(
                            ColumnDef::new(RolePermissions::PermKey)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(RolePermissions::Allowed)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_role_permissions_role")
                        .table(RolePermissions::Table)
                        .col(RolePermissions::Role)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(UserPermissionOverrides::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(UserPermissionOverrides::Id)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(UserPermissionOverrides::UserId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(UserPermissionOverrides::PermKey)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(UserPermissionOverrides::Allowed)
                                .boolean()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_user_permission_overrides_user")
                        .table(UserPermissionOverrides::Table)
                        .col(UserPermissionOverrides::UserId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(PermissionGrants::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(PermissionGrants::Id)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(PermissionGrants::UserId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(ColumnDef::new(PermissionGrants::PermKey).string().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(PermissionRevokes::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(PermissionRevokes::Id)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(PermissionRevokes::UserId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PermissionRevokes::PermKey)
                                .string()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(PermissionRevokes::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(PermissionGrants::Table).to_owned())
                .await?;
            manager
                .drop_table(
                    Table::drop()
                        .table(UserPermissionOverrides::Table)
                        .to_owned(),
                )
                .await?;
            manager
                .drop_table(Table::drop().table(RolePermissions::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum RolePermissions {
        Table,
        Id,
        Role,
        PermKey,
        Allowed,
    }

    #[derive(DeriveIden)]
    enum UserPermissionOverrides {
        Table,
        Id,
        UserId,
        PermKey,
        Allowed,
    }

    #[derive(DeriveIden)]
    enum PermissionGrants {
        Table,
        Id,
        UserId,
        PermKey,
    }

    #[derive(DeriveIden)]
    enum PermissionRevokes {
        Table,
        Id,
        UserId,
        PermKey,
    }
}

mod m20240101_000003_create_styles_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000003_create_styles_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Styles::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Styles::StyleId)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(Styles::StyleNo)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Styles::Description).string().null())
                        .col(ColumnDef::new(Styles::ImageUrls).json().null())
                        .col(ColumnDef::new(Styles::MainImageUrl).string().null())
                        .col(
                            ColumnDef::new(Styles::IsDeleted)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(Styles::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Styles::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Styles::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Styles {
        Table,
        StyleId,
        StyleNo,
        Description,
        ImageUrls,
        MainImageUrl,
        IsDeleted,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240101_000004_create_purchase_order_tables {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000004_create_purchase_order_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(PurchaseOrderHeaders::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(PurchaseOrderHeaders::PoHeaderId)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrderHeaders::PoNumber)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrderHeaders::BuyerCode)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrderHeaders::Status)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrderHeaders::CancelReason)
                                .string()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrderHeaders::CancelNote)
                                .string()
                                .null(),
                        )
                        .col(ColumnDef::new(PurchaseOrderHeaders::CancelDate).date().null())
                        .col(
                            ColumnDef::new(PurchaseOrderHeaders::IsDeleted)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrderHeaders::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrderHeaders::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(PurchaseOrderLines::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(PurchaseOrderLines::PoLineId)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrderLines::PoHeaderId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrderLines::LineNo)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrderLines::StyleId)
                                .big_integer()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrderLines::Description)
                                .string()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrderLines::OrderedQty)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrderLines::CancelledQty)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrderLines::UnitPrice)
                                .decimal()
                                .null(),
                        )
                        .col(ColumnDef::new(PurchaseOrderLines::ImageUrls).json().null())
                        .col(
                            ColumnDef::new(PurchaseOrderLines::IsDeleted)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrderLines::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrderLines::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_po_lines_header")
                        .table(PurchaseOrderLines::Table)
                        .col(PurchaseOrderLines::PoHeaderId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Shipments::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Shipments::ShipmentId)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(Shipments::ShipmentNo)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Shipments::ShippedDate).date().null())
                        .col(
                            ColumnDef::new(Shipments::IsDeleted)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(Shipments::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Shipments::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(ShipmentLines::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(ShipmentLines::ShipmentLineId)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(ShipmentLines::ShipmentId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ShipmentLines::PoLineId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ShipmentLines::ShippedQty)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ShipmentLines::IsDeleted)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_shipment_lines_po_line")
                        .table(ShipmentLines::Table)
                        .col(ShipmentLines::PoLineId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(ShipmentLines::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Shipments::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(PurchaseOrderLines::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(PurchaseOrderHeaders::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum PurchaseOrderHeaders {
        Table,
        PoHeaderId,
        PoNumber,
        BuyerCode,
        Status,
        CancelReason,
        CancelNote,
        CancelDate,
        IsDeleted,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum PurchaseOrderLines {
        Table,
        PoLineId,
        PoHeaderId,
        LineNo,
        StyleId,
        Description,
        OrderedQty,
        CancelledQty,
        UnitPrice,
        ImageUrls,
        IsDeleted,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum Shipments {
        Table,
        ShipmentId,
        ShipmentNo,
        ShippedDate,
        IsDeleted,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum ShipmentLines {
        Table,
        ShipmentLineId,
        ShipmentId,
        PoLineId,
        ShippedQty,
        IsDeleted,
    }
}

mod m20240101_000005_create_invoice_tables {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000005_create_invoice_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Invoices::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Invoices::InvoiceId)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Invoices::InvoiceNo).string().not_null())
                        .col(ColumnDef::new(Invoices::BuyerCode).string().not_null())
                        .col(ColumnDef::new(Invoices::Status).string().not_null())
                        .col(
                            ColumnDef::new(Invoices::RevisionOfInvoiceId)
                                .big_integer()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(Invoices::RevisionNo)
                                .integer()
                                .not_null()
                                .default(1),
                        )
                        .col(
                            ColumnDef::new(Invoices::IsLatest)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(ColumnDef::new(Invoices::Currency).string().null())
                        .col(ColumnDef::new(Invoices::Incoterm).string().null())
                        .col(ColumnDef::new(Invoices::Consignee).string().null())
                        .col(ColumnDef::new(Invoices::ShipTo).string().null())
                        .col(ColumnDef::new(Invoices::Remarks).string().null())
                        .col(
                            ColumnDef::new(Invoices::ConfirmedAt)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .col(ColumnDef::new(Invoices::ConfirmedBy).string().null())
                        .col(
                            ColumnDef::new(Invoices::IsDeleted)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(Invoices::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Invoices::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_invoices_revision_of")
                        .table(Invoices::Table)
                        .col(Invoices::RevisionOfInvoiceId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(InvoiceLines::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(InvoiceLines::InvoiceLineId)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(InvoiceLines::InvoiceId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(ColumnDef::new(InvoiceLines::LineNo).integer().not_null())
                        .col(ColumnDef::new(InvoiceLines::Description).string().null())
                        .col(ColumnDef::new(InvoiceLines::Qty).integer().not_null())
                        .col(ColumnDef::new(InvoiceLines::UnitPrice).decimal().not_null())
                        .col(ColumnDef::new(InvoiceLines::Amount).decimal().not_null())
                        .col(
                            ColumnDef::new(InvoiceLines::IsDeleted)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(InvoiceLines::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(InvoiceLines::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_invoice_lines_invoice")
                        .table(InvoiceLines::Table)
                        .col(InvoiceLines::InvoiceId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(InvoiceLines::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Invoices::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Invoices {
        Table,
        InvoiceId,
        InvoiceNo,
        BuyerCode,
        Status,
        RevisionOfInvoiceId,
        RevisionNo,
        IsLatest,
        Currency,
        Incoterm,
        Consignee,
        ShipTo,
        Remarks,
        ConfirmedAt,
        ConfirmedBy,
        IsDeleted,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum InvoiceLines {
        Table,
        InvoiceLineId,
        InvoiceId,
        LineNo,
        Description,
        Qty,
        UnitPrice,
        Amount,
        IsDeleted,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240101_000006_create_packing_tables {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000006_create_packing_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(PackingLists::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(PackingLists::PackingListId)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(PackingLists::PackingListNo)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(PackingLists::InvoiceId).big_integer().null())
                        .col(
                            ColumnDef::new(PackingLists::IsDeleted)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(PackingLists::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PackingLists::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(PackingListLines::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(PackingListLines::PackingLineId)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(PackingListLines::PackingListId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PackingListLines::LineNo)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PackingListLines::Description)
                                .string()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(PackingListLines::Cartons)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PackingListLines::ShippedQty)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PackingListLines::GwPerCtn)
                                .decimal()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PackingListLines::NwPerCtn)
                                .decimal()
                                .not_null(),
                        )
                        .col(ColumnDef::new(PackingListLines::Gw).decimal().not_null())
                        .col(ColumnDef::new(PackingListLines::Nw).decimal().not_null())
                        .col(
                            ColumnDef::new(PackingListLines::IsDeleted)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(PackingListLines::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PackingListLines::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_packing_lines_list")
                        .table(PackingListLines::Table)
                        .col(PackingListLines::PackingListId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(PackingListLines::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(PackingLists::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum PackingLists {
        Table,
        PackingListId,
        PackingListNo,
        InvoiceId,
        IsDeleted,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum PackingListLines {
        Table,
        PackingLineId,
        PackingListId,
        LineNo,
        Description,
        Cartons,
        ShippedQty,
        GwPerCtn,
        NwPerCtn,
        Gw,
        Nw,
        IsDeleted,
        CreatedAt,
        UpdatedAt,
    }
}
