use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(WalletLedgerEntries::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(WalletLedgerEntries::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(WalletLedgerEntries::VendorId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(WalletLedgerEntries::EntryType)
                            .string_len(24)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(WalletLedgerEntries::Amount)
                            .decimal_len(12, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(WalletLedgerEntries::Status)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(WalletLedgerEntries::ReferralId)
                            .integer()
                            .null(),
                    )
                    .col(ColumnDef::new(WalletLedgerEntries::PaymentId).uuid().null())
                    .col(
                        ColumnDef::new(WalletLedgerEntries::CashoutId)
                            .integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(WalletLedgerEntries::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(SimpleExpr::Keyword(Keyword::CurrentTimestamp)),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_wallet_ledger_vendor_created")
                    .table(WalletLedgerEntries::Table)
                    .col(WalletLedgerEntries::VendorId)
                    .col(WalletLedgerEntries::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // Maturation scans PENDING credit entries by age
        manager
            .create_index(
                Index::create()
                    .name("idx_wallet_ledger_type_status")
                    .table(WalletLedgerEntries::Table)
                    .col(WalletLedgerEntries::EntryType)
                    .col(WalletLedgerEntries::Status)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(WalletLedgerEntries::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum WalletLedgerEntries {
    Table,
    Id,
    VendorId,
    EntryType,
    Amount,
    Status,
    ReferralId,
    PaymentId,
    CashoutId,
    CreatedAt,
}
