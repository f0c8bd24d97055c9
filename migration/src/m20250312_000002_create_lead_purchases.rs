use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(LeadPurchases::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(LeadPurchases::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(LeadPurchases::VendorId).uuid().not_null())
                    .col(ColumnDef::new(LeadPurchases::LeadId).integer().not_null())
                    .col(
                        ColumnDef::new(LeadPurchases::PurchaseDate)
                            .timestamp()
                            .not_null()
                            .default(SimpleExpr::Keyword(Keyword::CurrentTimestamp)),
                    )
                    .col(
                        ColumnDef::new(LeadPurchases::Amount)
                            .decimal_len(12, 2)
                            .not_null()
                            .default("0"),
                    )
                    .col(ColumnDef::new(LeadPurchases::Mode).string_len(16).not_null())
                    .to_owned(),
            )
            .await?;

        // Serializes concurrent purchase attempts for the same (vendor, lead)
        manager
            .create_index(
                Index::create()
                    .name("idx_lead_purchases_vendor_lead")
                    .table(LeadPurchases::Table)
                    .col(LeadPurchases::VendorId)
                    .col(LeadPurchases::LeadId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Stats queries aggregate over (vendor, purchase_date) windows
        manager
            .create_index(
                Index::create()
                    .name("idx_lead_purchases_vendor_date")
                    .table(LeadPurchases::Table)
                    .col(LeadPurchases::VendorId)
                    .col(LeadPurchases::PurchaseDate)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(LeadPurchases::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum LeadPurchases {
    Table,
    Id,
    VendorId,
    LeadId,
    PurchaseDate,
    Amount,
    Mode,
}
