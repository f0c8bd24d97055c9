use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ReferralWallets::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ReferralWallets::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ReferralWallets::VendorId)
                            .uuid()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(ReferralWallets::AvailableBalance)
                            .decimal_len(12, 2)
                            .not_null()
                            .default("0"),
                    )
                    .col(
                        ColumnDef::new(ReferralWallets::PendingBalance)
                            .decimal_len(12, 2)
                            .not_null()
                            .default("0"),
                    )
                    // Amounts held by open cashout requests
                    .col(
                        ColumnDef::new(ReferralWallets::ReservedBalance)
                            .decimal_len(12, 2)
                            .not_null()
                            .default("0"),
                    )
                    .col(
                        ColumnDef::new(ReferralWallets::LifetimeEarned)
                            .decimal_len(12, 2)
                            .not_null()
                            .default("0"),
                    )
                    .col(
                        ColumnDef::new(ReferralWallets::LifetimePaidOut)
                            .decimal_len(12, 2)
                            .not_null()
                            .default("0"),
                    )
                    .col(
                        ColumnDef::new(ReferralWallets::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(SimpleExpr::Keyword(Keyword::CurrentTimestamp)),
                    )
                    .col(
                        ColumnDef::new(ReferralWallets::UpdatedAt)
                            .timestamp()
                            .not_null()
                            .default(SimpleExpr::Keyword(Keyword::CurrentTimestamp)),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ReferralWallets::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum ReferralWallets {
    Table,
    Id,
    VendorId,
    AvailableBalance,
    PendingBalance,
    ReservedBalance,
    LifetimeEarned,
    LifetimePaidOut,
    CreatedAt,
    UpdatedAt,
}
