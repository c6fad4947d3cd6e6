use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_rfq_tables::Migration),
            Box::new(m20250301_000002_create_supplier_quotation_tables::Migration),
            Box::new(m20250301_000003_create_purchase_order_tables::Migration),
        ]
    }
}

// Migration implementations

mod m20250301_000001_create_rfq_tables {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250301_000001_create_rfq_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(RfqItems::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(RfqItems::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(RfqItems::Rfq).string().not_null())
                        .col(ColumnDef::new(RfqItems::ItemCode).string().not_null())
                        .col(ColumnDef::new(RfqItems::ItemName).string().not_null())
                        .col(ColumnDef::new(RfqItems::Uom).string().not_null())
                        .col(ColumnDef::new(RfqItems::Qty).double().not_null().default(0.0))
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_rfq_items_rfq")
                        .table(RfqItems::Table)
                        .col(RfqItems::Rfq)
                        .if_not_exists()
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(RfqSuppliers::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(RfqSuppliers::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(RfqSuppliers::Rfq).string().not_null())
                        .col(ColumnDef::new(RfqSuppliers::Supplier).string().not_null())
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(RfqSuppliers::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(RfqItems::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum RfqItems {
        Table,
        Id,
        Rfq,
        ItemCode,
        ItemName,
        Uom,
        Qty,
    }

    #[derive(DeriveIden)]
    enum RfqSuppliers {
        Table,
        Id,
        Rfq,
        Supplier,
    }
}

mod m20250301_000002_create_supplier_quotation_tables {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250301_000002_create_supplier_quotation_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(SupplierQuotations::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(SupplierQuotations::Name)
                                .string()
                                .not_null()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(SupplierQuotations::Supplier).string().not_null())
                        .col(ColumnDef::new(SupplierQuotations::Currency).string().null())
                        .col(
                            ColumnDef::new(SupplierQuotations::Docstatus)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(SupplierQuotationItems::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(SupplierQuotationItems::Name)
                                .string()
                                .not_null()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(SupplierQuotationItems::Parent).string().not_null())
                        .col(
                            ColumnDef::new(SupplierQuotationItems::ItemCode)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(SupplierQuotationItems::ItemName)
                                .string()
                                .not_null(),
                        )
                        .col(ColumnDef::new(SupplierQuotationItems::Uom).string().not_null())
                        .col(
                            ColumnDef::new(SupplierQuotationItems::Qty)
                                .double()
                                .not_null()
                                .default(0.0),
                        )
                        .col(ColumnDef::new(SupplierQuotationItems::Rate).double().null())
                        .col(
                            ColumnDef::new(SupplierQuotationItems::CustomPoCreated)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_supplier_quotation_items_parent")
                                .from(SupplierQuotationItems::Table, SupplierQuotationItems::Parent)
                                .to(SupplierQuotations::Table, SupplierQuotations::Name)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(SupplierQuotationItems::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(SupplierQuotations::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum SupplierQuotations {
        Table,
        Name,
        Supplier,
        Currency,
        Docstatus,
    }

    #[derive(DeriveIden)]
    enum SupplierQuotationItems {
        Table,
        Name,
        Parent,
        ItemCode,
        ItemName,
        Uom,
        Qty,
        Rate,
        CustomPoCreated,
    }
}

mod m20250301_000003_create_purchase_order_tables {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250301_000003_create_purchase_order_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(PurchaseOrders::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(PurchaseOrders::Name)
                                .string()
                                .not_null()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(PurchaseOrders::Supplier).string().not_null())
                        .col(ColumnDef::new(PurchaseOrders::Company).string().not_null())
                        .col(ColumnDef::new(PurchaseOrders::Currency).string().not_null())
                        .col(ColumnDef::new(PurchaseOrders::TransactionDate).date().not_null())
                        .col(ColumnDef::new(PurchaseOrders::ScheduleDate).date().not_null())
                        .col(
                            ColumnDef::new(PurchaseOrders::Docstatus)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrders::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_purchase_orders_supplier_docstatus")
                        .table(PurchaseOrders::Table)
                        .col(PurchaseOrders::Supplier)
                        .col(PurchaseOrders::Docstatus)
                        .if_not_exists()
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(PurchaseOrderItems::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(PurchaseOrderItems::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(PurchaseOrderItems::Parent).string().not_null())
                        .col(ColumnDef::new(PurchaseOrderItems::ItemCode).string().not_null())
                        .col(ColumnDef::new(PurchaseOrderItems::ItemName).string().null())
                        .col(ColumnDef::new(PurchaseOrderItems::Uom).string().null())
                        .col(ColumnDef::new(PurchaseOrderItems::Qty).double().not_null())
                        .col(ColumnDef::new(PurchaseOrderItems::Rate).double().not_null())
                        .col(ColumnDef::new(PurchaseOrderItems::ScheduleDate).date().not_null())
                        .col(
                            ColumnDef::new(PurchaseOrderItems::UomConversionFactor)
                                .double()
                                .not_null()
                                .default(1.0),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_purchase_order_items_parent")
                                .from(PurchaseOrderItems::Table, PurchaseOrderItems::Parent)
                                .to(PurchaseOrders::Table, PurchaseOrders::Name)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(PurchaseOrderItems::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(PurchaseOrders::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum PurchaseOrders {
        Table,
        Name,
        Supplier,
        Company,
        Currency,
        TransactionDate,
        ScheduleDate,
        Docstatus,
        CreatedAt,
    }

    #[derive(DeriveIden)]
    enum PurchaseOrderItems {
        Table,
        Id,
        Parent,
        ItemCode,
        ItemName,
        Uom,
        Qty,
        Rate,
        ScheduleDate,
        UomConversionFactor,
    }
}
