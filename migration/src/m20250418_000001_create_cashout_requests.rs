use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CashoutRequests::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CashoutRequests::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CashoutRequests::VendorId).uuid().not_null())
                    .col(
                        ColumnDef::new(CashoutRequests::Amount)
                            .decimal_len(12, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CashoutRequests::BankDetailId)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(CashoutRequests::Note).text().null())
                    .col(
                        ColumnDef::new(CashoutRequests::Status)
                            .string_len(16)
                            .not_null()
                            .default("PENDING"),
                    )
                    .col(
                        ColumnDef::new(CashoutRequests::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(SimpleExpr::Keyword(Keyword::CurrentTimestamp)),
                    )
                    .col(
                        ColumnDef::new(CashoutRequests::UpdatedAt)
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
                    .name("idx_cashout_requests_vendor")
                    .table(CashoutRequests::Table)
                    .col(CashoutRequests::VendorId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_cashout_requests_status")
                    .table(CashoutRequests::Table)
                    .col(CashoutRequests::Status)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CashoutRequests::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum CashoutRequests {
    Table,
    Id,
    VendorId,
    Amount,
    BankDetailId,
    Note,
    Status,
    CreatedAt,
    UpdatedAt,
}
