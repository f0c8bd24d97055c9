use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(VendorQuotas::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(VendorQuotas::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(VendorQuotas::VendorId)
                            .uuid()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(VendorQuotas::DailyUsed)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(VendorQuotas::WeeklyUsed)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(VendorQuotas::YearlyUsed)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    // Snapshot of the active plan's limits, refreshed on read
                    .col(
                        ColumnDef::new(VendorQuotas::DailyLimit)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(VendorQuotas::WeeklyLimit)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(VendorQuotas::YearlyLimit)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(VendorQuotas::DailyResetAt).timestamp().null())
                    .col(
                        ColumnDef::new(VendorQuotas::WeeklyResetAt)
                            .timestamp()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(VendorQuotas::YearlyResetAt)
                            .timestamp()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(VendorQuotas::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(SimpleExpr::Keyword(Keyword::CurrentTimestamp)),
                    )
                    .col(
                        ColumnDef::new(VendorQuotas::UpdatedAt)
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
            .drop_table(Table::drop().table(VendorQuotas::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum VendorQuotas {
    Table,
    Id,
    VendorId,
    DailyUsed,
    WeeklyUsed,
    YearlyUsed,
    DailyLimit,
    WeeklyLimit,
    YearlyLimit,
    DailyResetAt,
    WeeklyResetAt,
    YearlyResetAt,
    CreatedAt,
    UpdatedAt,
}
