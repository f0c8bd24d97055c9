use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Referrals::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Referrals::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Referrals::ReferrerVendorId)
                            .uuid()
                            .not_null(),
                    )
                    // A vendor can be referred at most once
                    .col(
                        ColumnDef::new(Referrals::ReferredVendorId)
                            .uuid()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Referrals::Code).string_len(16).not_null())
                    .col(
                        ColumnDef::new(Referrals::Status)
                            .string_len(16)
                            .not_null()
                            .default("LINKED"),
                    )
                    .col(
                        ColumnDef::new(Referrals::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(SimpleExpr::Keyword(Keyword::CurrentTimestamp)),
                    )
                    .col(
                        ColumnDef::new(Referrals::UpdatedAt)
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
                    .name("idx_referrals_referrer")
                    .table(Referrals::Table)
                    .col(Referrals::ReferrerVendorId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Referrals::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Referrals {
    Table,
    Id,
    ReferrerVendorId,
    ReferredVendorId,
    Code,
    Status,
    CreatedAt,
    UpdatedAt,
}
