use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Leads::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Leads::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Leads::Title).string_len(255).not_null())
                    .col(
                        ColumnDef::new(Leads::ProductName)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Leads::Budget).decimal_len(12, 2).null())
                    .col(
                        ColumnDef::new(Leads::Quantity)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(ColumnDef::new(Leads::Location).string_len(255).null())
                    .col(
                        ColumnDef::new(Leads::Status)
                            .string_len(16)
                            .not_null()
                            .default("AVAILABLE"),
                    )
                    .col(ColumnDef::new(Leads::BuyerName).string_len(255).not_null())
                    .col(ColumnDef::new(Leads::BuyerEmail).string_len(255).null())
                    .col(ColumnDef::new(Leads::BuyerPhone).string_len(32).null())
                    // Owning vendor for direct proposals; null for marketplace leads
                    .col(ColumnDef::new(Leads::VendorId).uuid().null())
                    .col(
                        ColumnDef::new(Leads::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(SimpleExpr::Keyword(Keyword::CurrentTimestamp)),
                    )
                    .to_owned(),
            )
            .await?;

        // The eligibility query filters on status + created_at window
        manager
            .create_index(
                Index::create()
                    .name("idx_leads_status_created_at")
                    .table(Leads::Table)
                    .col(Leads::Status)
                    .col(Leads::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_leads_vendor_id")
                    .table(Leads::Table)
                    .col(Leads::VendorId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Leads::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Leads {
    Table,
    Id,
    Title,
    ProductName,
    Budget,
    Quantity,
    Location,
    Status,
    BuyerName,
    BuyerEmail,
    BuyerPhone,
    VendorId,
    CreatedAt,
}
